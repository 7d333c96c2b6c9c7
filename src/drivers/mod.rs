// src/drivers/mod.rs
// 与界面无关的核心：缓冲、解码、读行、驱动循环、绘图
pub mod buffer;
pub mod error;
pub mod figure;
pub mod pipeline;
pub mod plot;
pub mod rate;
pub mod record;
pub mod source;
// 公开导出常用类型，方便外部调用
pub use buffer::SensorHistories;
pub use error::VizError;
pub use figure::{build_frame, figure_title, standard_panels, FrameClock, PanelSpec};
pub use pipeline::{Driver, DriverSettings, Step};
pub use plot::{render_frame_rgb, PlotStyle};
pub use source::{open_serial, LineSource, SimulatedSource};
