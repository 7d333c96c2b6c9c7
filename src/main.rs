// src/main.rs
mod config;
mod drivers;
mod gui;
mod types;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use log::info;
use config::{RunMode, SourceKind, VisualizerConfig, CONFIG_FILE};
use drivers::{open_serial, Driver, LineSource, SimulatedSource};
fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
fn open_source(config: &VisualizerConfig) -> Result<Box<dyn LineSource + Send>> {
    let source: Box<dyn LineSource + Send> = match config.source {
        SourceKind::Serial => Box::new(
            open_serial(&config.port_name, config.baud_rate, config.read_timeout())
                .with_context(|| format!("cannot open serial port {}", config.port_name))?,
        ),
        SourceKind::Simulated => {
            let interval = Duration::from_millis(config.simulated_interval_ms);
            Box::new(match config.simulated_seed {
                Some(seed) => SimulatedSource::with_seed(seed, interval),
                None => SimulatedSource::new(interval),
            })
        }
    };
    Ok(source)
}
// 入口函数
fn main() -> Result<()> {
    init_logger();
    let config = VisualizerConfig::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("failed to load {CONFIG_FILE}"))?;
    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop.store(true, Ordering::SeqCst);
        })
        .context("failed to install Ctrl+C handler")?;
    }
    let source = open_source(&config)?;
    match config.mode {
        RunMode::Window => {
            info!("Starting 3D IMU visualization");
            info!("Red = accelerometer (mg), blue = gyroscope (dps), green = magnetometer (uT)");
            info!("The combined view shows all three sensors, scaled");
            info!("Press Ctrl+C to exit");
            gui::run_window(source, &config, stop)
                .map_err(|err| anyhow!("display failed: {err}"))?;
        }
        RunMode::Monitor => {
            info!("Monitoring packet rate; press Ctrl+C to exit");
            let mut driver = Driver::new(source, config.driver_settings());
            driver.run(&stop, |_| Ok(()));
        }
    }
    info!("Serial connection closed, bye.");
    Ok(())
}
