// src/config.rs
use std::fs;
use std::path::Path;
use std::time::Duration;
use serde::Deserialize;
use crate::drivers::{DriverSettings, PlotStyle, VizError};

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "imu3d.toml";
/// Largest accepted figure side, in pixels.
pub const MAX_FIGURE_SIDE: u32 = 8192;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Serial,
    Simulated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Four 3D panels in a window.
    Window,
    /// Headless: only packet-rate reports in the log.
    Monitor,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizerConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub history_len: usize,
    pub read_timeout_ms: u64,
    pub idle_warning_secs: u64,
    pub source: SourceKind,
    pub mode: RunMode,
    pub simulated_interval_ms: u64,
    /// Fixed seed for reproducible simulated data.
    pub simulated_seed: Option<u64>,
    pub figure_width: u32,
    pub figure_height: u32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            port_name: "/dev/ttyUSB0".to_owned(),
            baud_rate: 230_400,
            history_len: 100,
            read_timeout_ms: 1000,
            idle_warning_secs: 5,
            source: SourceKind::Serial,
            mode: RunMode::Window,
            simulated_interval_ms: 10,
            simulated_seed: None,
            figure_width: 1800,
            figure_height: 600,
        }
    }
}

impl VisualizerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, VizError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` when it exists, otherwise fall back to the built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, VizError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .map_err(|e| VizError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VizError> {
        if self.history_len == 0 {
            return Err(VizError::Config("history_len must be at least 1".into()));
        }
        if self.baud_rate == 0 {
            return Err(VizError::Config("baud_rate must be greater than zero".into()));
        }
        if self.port_name.trim().is_empty() && self.source == SourceKind::Serial {
            return Err(VizError::Config("port_name is empty".into()));
        }
        if self.read_timeout_ms == 0 {
            return Err(VizError::Config("read_timeout_ms must be greater than zero".into()));
        }
        if self.figure_width < 400 || self.figure_height < 200 {
            return Err(VizError::Config("figure must be at least 400x200".into()));
        }
        if self.figure_width > MAX_FIGURE_SIDE || self.figure_height > MAX_FIGURE_SIDE {
            return Err(VizError::Config(format!(
                "figure sides must not exceed {MAX_FIGURE_SIDE} px"
            )));
        }
        Ok(())
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            history_len: self.history_len,
            idle_warning: Duration::from_secs(self.idle_warning_secs),
            ..Default::default()
        }
    }

    pub fn plot_style(&self) -> PlotStyle {
        PlotStyle::with_size(self.figure_width, self.figure_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::error::ErrorKind;

    #[test]
    fn defaults_match_device_constants() {
        let config = VisualizerConfig::default();
        assert_eq!(config.port_name, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 230_400);
        assert_eq!(config.history_len, 100);
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = VisualizerConfig::from_toml_str(
            "port_name = \"COM4\"\nsource = \"simulated\"\nmode = \"monitor\"\n",
        )
        .unwrap();
        assert_eq!(config.port_name, "COM4");
        assert_eq!(config.source, SourceKind::Simulated);
        assert_eq!(config.mode, RunMode::Monitor);
        assert_eq!(config.baud_rate, 230_400);
        assert_eq!(config.driver_settings().history_len, 100);
    }

    #[test]
    fn rejects_bad_values() {
        let err = VisualizerConfig::from_toml_str("history_len = 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = VisualizerConfig::from_toml_str("baud = 9600").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = VisualizerConfig::from_toml_str("read_timeout_ms = 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = VisualizerConfig::from_toml_str("figure_width = 40000\nfigure_height = 40000")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = VisualizerConfig::from_toml_str("figure_height = 8193").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn largest_figure_fits_in_memory_math() {
        let config = VisualizerConfig::from_toml_str("figure_width = 8192\nfigure_height = 8192")
            .unwrap();
        assert_eq!(config.plot_style().buffer_len(), 8192 * 8192 * 3);
    }

    #[test]
    fn simulated_seed_is_optional() {
        assert_eq!(VisualizerConfig::default().simulated_seed, None);
        let config = VisualizerConfig::from_toml_str("simulated_seed = 7").unwrap();
        assert_eq!(config.simulated_seed, Some(7));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config =
            VisualizerConfig::load_or_default(Path::new("definitely/not/here/imu3d.toml")).unwrap();
        assert_eq!(config, VisualizerConfig::default());
    }
}
