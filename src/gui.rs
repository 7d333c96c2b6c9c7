// src/gui.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use eframe::egui;
use egui::{Color32, TextureHandle, TextureOptions, Vec2};
use log::info;
use crate::config::VisualizerConfig;
use crate::drivers::{
    build_frame, figure_title, render_frame_rgb, standard_panels, Driver, FrameClock, LineSource,
    PanelSpec, PlotStyle, Step, VizError,
};

/// Pause between iterations so the window stays responsive.
const YIELD: Duration = Duration::from_millis(1);

/// eframe shell around the driver loop: each `update` is one iteration
/// (read, decode, append) followed by a redraw when a record was accepted.
pub struct Imu3dApp<S: LineSource> {
    driver: Driver<S>,
    panels: Vec<PanelSpec>,
    style: PlotStyle,
    clock: FrameClock,
    title: String,
    raster: Vec<u8>,
    texture: Option<TextureHandle>,
    stop: Arc<AtomicBool>,
}

impl<S: LineSource> Imu3dApp<S> {
    pub fn new(driver: Driver<S>, style: PlotStyle, stop: Arc<AtomicBool>) -> Self {
        Self {
            driver,
            panels: standard_panels(),
            raster: Vec::with_capacity(style.buffer_len()),
            style,
            clock: FrameClock::new(),
            title: figure_title(None, None),
            texture: None,
            stop,
        }
    }

    /// Rasterize the current histories into a fresh image.
    fn render(&mut self) -> Result<egui::ColorImage, VizError> {
        if self.clock.tick().is_some() {
            self.title = figure_title(self.clock.fps(), self.driver.histories().latest_temperature());
        }
        let frame = build_frame(&self.panels, self.driver.histories(), &self.title);
        render_frame_rgb(&frame, &self.style, &mut self.raster)?;
        let size = [self.style.width as usize, self.style.height as usize];
        Ok(egui::ColorImage::from_rgb(size, &self.raster))
    }

    /// One loop iteration. Returns a new image when a record was accepted and
    /// drawn; render failures go through the driver's report like any other
    /// skipped iteration.
    fn advance(&mut self) -> Option<egui::ColorImage> {
        if self.driver.step() != Step::Updated {
            return None;
        }
        match self.render() {
            Ok(image) => Some(image),
            Err(err) => {
                self.driver.report(&err);
                None
            }
        }
    }

    fn upload(&mut self, ctx: &egui::Context, image: egui::ColorImage) {
        if let Some(texture) = self.texture.as_mut() {
            texture.set(image, TextureOptions::LINEAR);
        } else {
            self.texture = Some(ctx.load_texture("imu3d-figure", image, TextureOptions::LINEAR));
        }
    }

    /// Largest size with the figure's aspect ratio that fits in `available`.
    fn fit(&self, available: Vec2) -> Vec2 {
        let aspect = self.style.width as f32 / self.style.height as f32;
        let width = available.x.min(available.y * aspect).max(1.0);
        Vec2::new(width, width / aspect)
    }
}

impl<S: LineSource> eframe::App for Imu3dApp<S> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Ctrl+C：释放串口后关闭窗口
        if self.stop.load(Ordering::SeqCst) {
            self.driver.shutdown();
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        if let Some(image) = self.advance() {
            self.upload(ctx, image);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::WHITE))
            .show(ctx, |ui| match &self.texture {
                Some(texture) => {
                    let size = self.fit(ui.available_size());
                    ui.vertical_centered(|ui| {
                        ui.image((texture.id(), size));
                    });
                }
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            egui::RichText::new("Waiting for data...")
                                .color(Color32::DARK_GRAY)
                                .size(18.0),
                        );
                    });
                }
            });

        ctx.request_repaint_after(YIELD);
    }
}

/// Open the window and block until it is closed or interrupted.
pub fn run_window<S>(
    source: S,
    config: &VisualizerConfig,
    stop: Arc<AtomicBool>,
) -> eframe::Result<()>
where
    S: LineSource + Send + 'static,
{
    let style = config.plot_style();
    let driver = Driver::new(source, config.driver_settings());
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([style.width as f32, style.height as f32 + 16.0])
        .with_min_inner_size([640.0, 240.0])
        .with_title("IMU 3D Visualization");
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    info!("Opening display ({}x{})", style.width, style.height);
    eframe::run_native(
        "imu3d",
        options,
        Box::new(move |_cc| Box::new(Imu3dApp::new(driver, style, stop))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::error::ErrorKind;
    use crate::drivers::source::ManualSource;

    const GOOD: &str = r#"{"accX":1,"accY":2,"accZ":3,"gyrX":0.1,"gyrY":0.2,"gyrZ":0.3,"magX":10,"magY":20,"magZ":30}"#;

    fn app(lines: &[&str]) -> Imu3dApp<ManualSource> {
        let driver = Driver::new(ManualSource::new(lines.iter().copied()), Default::default());
        Imu3dApp::new(driver, PlotStyle::with_size(400, 200), Arc::new(AtomicBool::new(false)))
    }

    #[test]
    fn render_failure_is_reported_by_the_driver() {
        let mut app = app(&[GOOD, "not json"]);
        app.panels.clear();
        assert!(app.advance().is_none());
        assert_eq!(app.driver.skipped(), 1);
        assert_eq!(app.driver.accepted(), 1);
        // a bad line afterwards is counted the same way
        assert!(app.advance().is_none());
        assert_eq!(app.driver.skipped(), 2);
        assert_eq!(app.driver.step(), Step::Idle);
    }

    #[test]
    fn idle_and_rejected_lines_draw_nothing() {
        let mut app = app(&["", "{\"accX\":1}"]);
        assert!(app.advance().is_none());
        assert!(app.advance().is_none());
        assert_eq!(app.driver.skipped(), 1);
        assert_eq!(
            app.driver.report(&VizError::Plot("x".into())),
            ErrorKind::Render
        );
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let app = app(&[]);
        let size = app.fit(Vec2::new(1000.0, 1000.0));
        assert_eq!(size, Vec2::new(1000.0, 500.0));
        let size = app.fit(Vec2::new(1000.0, 100.0));
        assert_eq!(size, Vec2::new(200.0, 100.0));
    }
}
