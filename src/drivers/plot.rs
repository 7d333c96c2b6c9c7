use plotters::coord::cartesian::Cartesian3d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use crate::drivers::error::VizError;
use crate::drivers::figure::{
    Frame, PanelFrame, SignalLayer, AZIMUTH_DEG, ELEVATION_DEG, TRAIL_ALPHA,
};
use crate::types::Signal;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub title_height: u32,
    pub projection_scale: f64,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1800,
            height: 600,
            background: WHITE,
            title_height: 36,
            projection_scale: 0.75,
        }
    }
}
impl PlotStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
    pub fn buffer_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}
pub fn signal_color(signal: Signal) -> RGBColor {
    let (r, g, b) = signal.rgb();
    RGBColor(r, g, b)
}
const OVERLAY_LINE_PX: i32 = 12;
const OVERLAY_WIDTH_PX: i32 = 92;
/// Rasterize a whole frame (figure title plus one column per panel) into `buffer`
/// as packed RGB. The buffer is resized to fit the style.
pub fn render_frame_rgb(
    frame: &Frame,
    style: &PlotStyle,
    buffer: &mut Vec<u8>,
) -> Result<(), VizError> {
    if frame.panels.is_empty() {
        return Err(VizError::Plot("frame has no panels".into()));
    }
    buffer.resize(style.buffer_len(), 0);
    {
        let root = BitMapBackend::with_buffer(buffer.as_mut_slice(), (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (title_area, body) = root.split_vertically(style.title_height as i32);
        title_area.draw(&Text::new(
            frame.title.as_str(),
            ((style.width / 2) as i32, 8),
            ("sans-serif", 20)
                .into_font()
                .style(FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
        let columns = body.split_evenly((1, frame.panels.len()));
        for (area, panel) in columns.iter().zip(&frame.panels) {
            draw_panel(area, panel, style)?;
        }
        root.present()?;
    }
    Ok(())
}
fn draw_panel(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    panel: &PanelFrame,
    style: &PlotStyle,
) -> Result<(), VizError> {
    let (r, g, b) = panel.title_rgb;
    let title_color = RGBColor(r, g, b);
    let l = panel.limit;
    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .caption(
            panel.title,
            ("sans-serif", 16)
                .into_font()
                .style(FontStyle::Bold)
                .color(&title_color),
        )
        .build_cartesian_3d(-l..l, -l..l, -l..l)?;
    let scale = style.projection_scale;
    chart.with_projection(|mut pb| {
        pb.pitch = ELEVATION_DEG.to_radians();
        pb.yaw = AZIMUTH_DEG.to_radians();
        pb.scale = scale;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.08).stroke_width(1))
        .max_light_lines(3)
        .draw()?;
    // reference arrows with axis names at their tips
    let reference = RGBColor(128, 128, 128).mix(0.3).stroke_width(1);
    for (tip, name) in panel.reference_axes().iter().zip(["X", "Y", "Z"]) {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0, 0.0), tip.as_tuple()],
            reference,
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            name,
            tip.as_tuple(),
            ("sans-serif", 12).into_font().color(&title_color),
        )))?;
    }
    for layer in &panel.layers {
        draw_layer(&mut chart, layer)?;
    }
    for (slot, layer) in panel.layers.iter().enumerate() {
        draw_overlay(area, layer, slot)?;
    }
    Ok(())
}
type Chart3d<'a, 'b> = ChartContext<
    'a,
    BitMapBackend<'b>,
    Cartesian3d<RangedCoordf64, RangedCoordf64, RangedCoordf64>,
>;
fn draw_layer(chart: &mut Chart3d<'_, '_>, layer: &SignalLayer) -> Result<(), VizError> {
    let color = signal_color(layer.signal);
    if !layer.trail.is_empty() {
        chart.draw_series(LineSeries::new(
            layer.trail.iter().map(|s| s.as_tuple()),
            color.mix(TRAIL_ALPHA).stroke_width(1),
        ))?;
        chart.draw_series(
            layer
                .markers
                .iter()
                .map(|m| Circle::new(m.position.as_tuple(), 3, color.mix(m.alpha).filled())),
        )?;
    }
    let tip = layer.vector.as_tuple();
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(0.0, 0.0, 0.0), tip],
        color.stroke_width(4),
    )))?;
    chart.draw_series(std::iter::once(Circle::new(tip, 4, color.filled())))?;
    Ok(())
}
/// Text box in the panel's top-left corner; multiple layers stack downwards.
fn draw_overlay(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    layer: &SignalLayer,
    slot: usize,
) -> Result<(), VizError> {
    let color = signal_color(layer.signal);
    let lines = layer.overlay.len() as i32;
    let height = lines * OVERLAY_LINE_PX + 8;
    let x0 = 6;
    let y0 = 28 + slot as i32 * (height + 6);
    area.draw(&Rectangle::new(
        [(x0, y0), (x0 + OVERLAY_WIDTH_PX, y0 + height)],
        WHITE.mix(0.8).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(x0, y0), (x0 + OVERLAY_WIDTH_PX, y0 + height)],
        color.mix(0.6).stroke_width(1),
    ))?;
    for (i, line) in layer.overlay.iter().enumerate() {
        area.draw(&Text::new(
            line.as_str(),
            (x0 + 4, y0 + 4 + i as i32 * OVERLAY_LINE_PX),
            ("sans-serif", 11).into_font().color(&BLACK),
        ))?;
    }
    Ok(())
}
