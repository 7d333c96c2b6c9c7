//! Per-frame model of the four 3D panels.
//!
//! Everything here is plain data computed from the current histories, so the
//! layout rules (limits, scale factors, trail opacity, overlays) can be checked
//! without a display. `plot.rs` turns a [`Frame`] into pixels.
use std::time::{Duration, Instant};
use crate::drivers::SensorHistories;
use crate::types::{Sample, Signal};
pub const FIGURE_TITLE: &str = "IMU 3D Visualization";
/// Camera elevation and azimuth shared by every panel, in degrees.
pub const ELEVATION_DEG: f64 = 20.0;
pub const AZIMUTH_DEG: f64 = 45.0;
/// How many of the newest samples get a point marker.
pub const MARKER_COUNT: usize = 10;
pub const MARKER_MAX_ALPHA: f64 = 0.6;
pub const TRAIL_ALPHA: f64 = 0.3;
/// Reference arrows run this fraction of the axis limit.
pub const REFERENCE_FRACTION: f64 = 0.3;
/// The figure title is refreshed on every multiple of this frame count.
pub const FPS_REFRESH_FRAMES: u64 = 50;
/// Static definition of one panel: which signals it shows and how.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSpec {
    pub title: &'static str,
    pub limit: f64,
    pub title_rgb: (u8, u8, u8),
    /// (signal, display scale factor)
    pub layers: Vec<(Signal, f64)>,
}
/// Three single-signal panels followed by the combined view. The combined scale
/// factors bring all three signals to a comparable size inside a +-100 cube.
pub fn standard_panels() -> Vec<PanelSpec> {
    vec![
        PanelSpec {
            title: Signal::Accelerometer.title(),
            limit: 1000.0,
            title_rgb: Signal::Accelerometer.rgb(),
            layers: vec![(Signal::Accelerometer, 1.0)],
        },
        PanelSpec {
            title: Signal::Gyroscope.title(),
            limit: 10.0,
            title_rgb: Signal::Gyroscope.rgb(),
            layers: vec![(Signal::Gyroscope, 1.0)],
        },
        PanelSpec {
            title: Signal::Magnetometer.title(),
            limit: 100.0,
            title_rgb: Signal::Magnetometer.rgb(),
            layers: vec![(Signal::Magnetometer, 1.0)],
        },
        PanelSpec {
            title: "Combined View",
            limit: 100.0,
            title_rgb: (0, 0, 0),
            layers: vec![
                (Signal::Accelerometer, 0.1),
                (Signal::Gyroscope, 10.0),
                (Signal::Magnetometer, 1.0),
            ],
        },
    ]
}
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Marker {
    pub position: Sample,
    pub alpha: f64,
}
/// Drawables for one signal inside one panel. Positions are already scaled.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalLayer {
    pub signal: Signal,
    pub vector: Sample,
    pub trail: Vec<Sample>,
    pub markers: Vec<Marker>,
    /// Magnitude and per-axis values of the latest unscaled sample.
    pub overlay: Vec<String>,
}
#[derive(Clone, Debug, PartialEq)]
pub struct PanelFrame {
    pub title: &'static str,
    pub limit: f64,
    pub title_rgb: (u8, u8, u8),
    pub layers: Vec<SignalLayer>,
}
impl PanelFrame {
    /// Tips of the faint +X, +Y, +Z reference arrows.
    pub fn reference_axes(&self) -> [Sample; 3] {
        let r = self.limit * REFERENCE_FRACTION;
        [
            Sample::new(r, 0.0, 0.0),
            Sample::new(0.0, r, 0.0),
            Sample::new(0.0, 0.0, r),
        ]
    }
}
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub title: String,
    pub panels: Vec<PanelFrame>,
}
pub fn overlay_lines(signal: Signal, latest: Sample) -> Vec<String> {
    vec![
        signal.tag().to_owned(),
        format!("Mag: {:.1}", latest.magnitude()),
        format!("X: {:.1}", latest.x),
        format!("Y: {:.1}", latest.y),
        format!("Z: {:.1}", latest.z),
    ]
}
/// Build the drawables for one signal; `None` when the history is still empty.
pub fn build_layer(histories: &SensorHistories, signal: Signal, scale: f64) -> Option<SignalLayer> {
    let history = histories.get(signal);
    let latest = history.latest()?;
    let len = history.len();
    let (trail, markers) = if len > 1 {
        let trail = history.all().map(|s| s.scaled(scale)).collect();
        let markers = history
            .recent(MARKER_COUNT)
            .map(|(i, s)| Marker {
                position: s.scaled(scale),
                alpha: MARKER_MAX_ALPHA * (i + 1) as f64 / len as f64,
            })
            .collect();
        (trail, markers)
    } else {
        (Vec::new(), Vec::new())
    };
    Some(SignalLayer {
        signal,
        vector: latest.scaled(scale),
        trail,
        markers,
        overlay: overlay_lines(signal, latest),
    })
}
pub fn build_frame(specs: &[PanelSpec], histories: &SensorHistories, title: &str) -> Frame {
    let panels = specs
        .iter()
        .map(|spec| PanelFrame {
            title: spec.title,
            limit: spec.limit,
            title_rgb: spec.title_rgb,
            layers: spec
                .layers
                .iter()
                .filter_map(|&(signal, scale)| build_layer(histories, signal, scale))
                .collect(),
        })
        .collect();
    Frame {
        title: title.to_owned(),
        panels,
    }
}
pub fn figure_title(fps: Option<f64>, temperature: Option<f64>) -> String {
    let mut title = FIGURE_TITLE.to_owned();
    if let Some(fps) = fps {
        title.push_str(&format!(" - {fps:.1} FPS"));
    }
    if let Some(t) = temperature {
        title.push_str(&format!(" - {t:.1} °C"));
    }
    title
}
/// Counts rendered frames and measures the average frame rate since start,
/// refreshing the figure every [`FPS_REFRESH_FRAMES`] frames.
pub struct FrameClock {
    started: Instant,
    frames: u64,
    fps: Option<f64>,
}
impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }
    pub fn starting_at(now: Instant) -> Self {
        Self {
            started: now,
            frames: 0,
            fps: None,
        }
    }
    #[cfg(test)]
    pub fn frames(&self) -> u64 {
        self.frames
    }
    pub fn fps(&self) -> Option<f64> {
        self.fps
    }
    pub fn tick(&mut self) -> Option<f64> {
        self.tick_at(Instant::now())
    }
    /// Count one frame; returns the new average when this frame refreshed it.
    pub fn tick_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        if self.frames % FPS_REFRESH_FRAMES != 0 {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.started);
        if elapsed == Duration::ZERO {
            return None;
        }
        let fps = self.frames as f64 / elapsed.as_secs_f64();
        self.fps = Some(fps);
        Some(fps)
    }
}
impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
