// @file plot.rs
// @brief hexbin chart, controls, legend and message panels

use crate::axis::{AxisAppearance, Direction, GeoAxis};
use crate::color::SequentialColorMap;
use crate::config::ChartConfig;
use crate::hexbin::HexBinner;
use crate::layout::{LayoutElem, StructuredDrawingArea};
use crate::scale::{format_latitude, format_longitude};
use crate::scene::Scene;
use crate::session::ChartSession;
use anyhow::Result;
use plotters::coord::Shift;
use plotters::element::{Drawable, PointCollection};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_backend::DrawingErrorKind;
use std::path::Path;

const CONTROLS_HEIGHT: u32 = 40;
const LEGEND_HEIGHT: u32 = 56;
const LEGEND_BAR: (u32, u32) = (200, 10);
const TOOLTIP_PADDING: i32 = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> OutputFormat {
        match path.extension().and_then(|x| x.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => OutputFormat::Svg,
            _ => OutputFormat::Png,
        }
    }
}

#[derive(Clone)]
pub struct ChartAppearance<'a> {
    pub title_style: TextStyle<'a>,
    pub text_style: TextStyle<'a>,
    pub axis: AxisAppearance<'a>,
    pub outline: RGBColor,
    pub stroke: RGBColor,
}

impl<'a> ChartAppearance<'a> {
    pub fn from_config(config: &'a ChartConfig) -> Result<ChartAppearance<'a>> {
        let style = config.style()?;
        let family = config.font_family.as_str();
        let size = config.font_size as f64;
        let text_style = TextStyle::from((family, size).into_font()).color(&BLACK);
        Ok(ChartAppearance {
            title_style: TextStyle::from((family, size * 2.0).into_font().style(FontStyle::Bold)).color(&BLACK),
            text_style: text_style.clone(),
            axis: AxisAppearance {
                tick_length: 6,
                label_setback: 3,
                desired_ticks: 10,
                label_style: text_style,
            },
            outline: style.outline,
            stroke: style.stroke,
        })
    }
}

// 0.6 em per glyph
fn text_width(text: &str, style: &TextStyle) -> i32 {
    (text.chars().count() as f64 * style.font.get_size() * 0.6).round() as i32
}

fn hexagon_path(binner: &HexBinner, origin: (i32, i32), center: (f64, f64)) -> Vec<(i32, i32)> {
    binner
        .hexagon()
        .iter()
        .map(|(dx, dy)| {
            (
                origin.0 + (center.0 + dx).round() as i32,
                origin.1 + (center.1 + dy).round() as i32,
            )
        })
        .collect()
}

/// Outline layer, active hexagons and the tooltip, in plot pixel space.
pub struct HexLayer<'a> {
    scene: &'a Scene,
    binner: &'a HexBinner,
    app: &'a ChartAppearance<'a>,
}

impl<'a> HexLayer<'a> {
    pub fn new(scene: &'a Scene, binner: &'a HexBinner, app: &'a ChartAppearance<'a>) -> HexLayer<'a> {
        HexLayer { scene, binner, app }
    }

    fn draw_tooltip<DB: DrawingBackend>(
        &self,
        pos: (i32, i32),
        backend: &mut DB,
        dim: (u32, u32),
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let Some(tooltip) = &self.scene.tooltip else {
            return Ok(());
        };
        let style = &self.app.text_style;
        let width = tooltip.lines.iter().map(|x| text_width(x, style)).max().unwrap_or(0);
        let line_height = style.font.get_size() as i32 + 4;
        let box_w = width + 2 * TOOLTIP_PADDING;
        let box_h = line_height * tooltip.lines.len() as i32 + 2 * TOOLTIP_PADDING;

        let x = (tooltip.x.round() as i32).clamp(0, (dim.0 as i32 - box_w).max(0));
        let y = (tooltip.y.round() as i32).clamp(0, (dim.1 as i32 - box_h).max(0));
        let ul = (pos.0 + x, pos.1 + y);
        let br = (ul.0 + box_w, ul.1 + box_h);
        backend.draw_rect(ul, br, &WHITE.mix(0.9), true)?;
        backend.draw_rect(ul, br, &self.app.outline, false)?;

        let style = style.pos(Pos::new(HPos::Left, VPos::Top));
        for (i, line) in tooltip.lines.iter().enumerate() {
            let p = (ul.0 + TOOLTIP_PADDING, ul.1 + TOOLTIP_PADDING + i as i32 * line_height);
            backend.draw_text(line, &style, p)?;
        }
        Ok(())
    }
}

impl<'a> PointCollection<'a, (i32, i32)> for &'a HexLayer<'_> {
    type Point = &'a (i32, i32);
    type IntoIter = std::iter::Once<&'a (i32, i32)>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&(0, 0))
    }
}

impl<DB> Drawable<DB> for HexLayer<'_>
where
    DB: DrawingBackend,
{
    fn draw<I>(&self, pos: I, backend: &mut DB, dim: (u32, u32)) -> Result<(), DrawingErrorKind<DB::ErrorType>>
    where
        I: Iterator<Item = (i32, i32)>,
    {
        let mut pos = pos;
        let Some(pos) = pos.next() else {
            return Ok(());
        };
        let closed = |mut v: Vec<(i32, i32)>| {
            if let Some(&first) = v.first() {
                v.push(first);
            }
            v
        };

        for &center in &self.scene.outline {
            let path = closed(hexagon_path(self.binner, pos, center));
            backend.draw_path(path, &self.app.outline)?;
        }

        for (i, shape) in self.scene.active.iter().enumerate() {
            let path = hexagon_path(self.binner, pos, (shape.x, shape.y));
            let opacity = if self.scene.hovered == Some(i) { 0.8 } else { 1.0 };
            backend.fill_polygon(path.clone(), &shape.fill.mix(opacity))?;
            backend.draw_path(closed(path), &self.app.stroke)?;
        }

        self.draw_tooltip(pos, backend, dim)
    }
}

/// Checkbox strip mirroring the filter state, followed by a selection summary.
pub struct ControlStrip<'a> {
    toggles: &'a [(String, bool)],
    shown: usize,
    total: usize,
    style: &'a TextStyle<'a>,
}

impl<'a> ControlStrip<'a> {
    pub fn new(session: &'a ChartSession, style: &'a TextStyle<'a>) -> ControlStrip<'a> {
        let shown = session.scene().active.iter().map(|x| x.count).sum();
        ControlStrip {
            toggles: session.filter().toggles(),
            shown,
            total: session.dataset().len(),
            style,
        }
    }

    pub fn summary(&self) -> String {
        format!("Showing {} of {} sightings", self.shown, self.total)
    }
}

impl<'a> PointCollection<'a, (i32, i32)> for &'a ControlStrip<'_> {
    type Point = &'a (i32, i32);
    type IntoIter = std::iter::Once<&'a (i32, i32)>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&(0, 0))
    }
}

impl<DB> Drawable<DB> for ControlStrip<'_>
where
    DB: DrawingBackend,
{
    fn draw<I>(&self, pos: I, backend: &mut DB, dim: (u32, u32)) -> Result<(), DrawingErrorKind<DB::ErrorType>>
    where
        I: Iterator<Item = (i32, i32)>,
    {
        let mut pos = pos;
        let Some(pos) = pos.next() else {
            return Ok(());
        };
        const BOX: i32 = 10;
        const GAP: i32 = 15;
        let style = self.style.pos(Pos::new(HPos::Left, VPos::Center));
        let header = "Filter by fur color:";
        let summary = self.summary();

        let mut pieces = Vec::new();
        pieces.push(text_width(header, &style) + GAP);
        for (name, _) in self.toggles {
            pieces.push(BOX + 4 + text_width(name, &style) + GAP);
        }
        pieces.push(text_width(&summary, &style));
        let total = pieces.iter().sum::<i32>();

        let y = pos.1 + dim.1 as i32 / 2;
        let mut x = pos.0 + ((dim.0 as i32 - total) / 2).max(0);
        backend.draw_text(header, &style, (x, y))?;
        x += pieces[0];

        for ((name, selected), w) in self.toggles.iter().zip(&pieces[1..]) {
            let ul = (x, y - BOX / 2);
            backend.draw_rect(ul, (ul.0 + BOX, ul.1 + BOX), &BLACK, false)?;
            if *selected {
                backend.draw_rect((ul.0 + 2, ul.1 + 2), (ul.0 + BOX - 2, ul.1 + BOX - 2), &BLACK, true)?;
            }
            backend.draw_text(name, &style, (x + BOX + 4, y))?;
            x += w;
        }
        backend.draw_text(&summary, &style.color(&RGBColor(0x66, 0x66, 0x66)), (x, y))?;
        Ok(())
    }
}

/// Gradient bar over `[0, max_count]`.
pub struct ColorLegend<'a> {
    color_map: &'a SequentialColorMap,
    max_count: usize,
    style: &'a TextStyle<'a>,
}

impl<'a> ColorLegend<'a> {
    pub fn new(color_map: &'a SequentialColorMap, max_count: usize, style: &'a TextStyle<'a>) -> ColorLegend<'a> {
        ColorLegend {
            color_map,
            max_count,
            style,
        }
    }

    pub fn labels(&self) -> Vec<(f64, String)> {
        match self.max_count {
            0 => Vec::new(),
            1 => vec![(0.0, "0".to_string()), (1.0, "1".to_string())],
            n => vec![
                (0.0, "0".to_string()),
                (0.5, format!("{}", n as f64 / 2.0)),
                (1.0, format!("{n}")),
            ],
        }
    }
}

impl<'a> PointCollection<'a, (i32, i32)> for &'a ColorLegend<'_> {
    type Point = &'a (i32, i32);
    type IntoIter = std::iter::Once<&'a (i32, i32)>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&(0, 0))
    }
}

impl<DB> Drawable<DB> for ColorLegend<'_>
where
    DB: DrawingBackend,
{
    fn draw<I>(&self, pos: I, backend: &mut DB, dim: (u32, u32)) -> Result<(), DrawingErrorKind<DB::ErrorType>>
    where
        I: Iterator<Item = (i32, i32)>,
    {
        let mut pos = pos;
        let Some(pos) = pos.next() else {
            return Ok(());
        };
        let center = pos.0 + dim.0 as i32 / 2;
        let caption = self.style.pos(Pos::new(HPos::Center, VPos::Top));
        if self.max_count == 0 {
            backend.draw_text("No sightings selected", &caption, (center, pos.1 + 4))?;
            return Ok(());
        }
        backend.draw_text("Sightings per hexagon", &caption, (center, pos.1 + 4))?;

        let (w, h) = (LEGEND_BAR.0 as i32, LEGEND_BAR.1 as i32);
        let x0 = center - w / 2;
        let y0 = pos.1 + 22;
        for i in 0..w {
            let c = self.color_map.interpolate(i as f64 / (w - 1) as f64);
            backend.draw_rect((x0 + i, y0), (x0 + i + 1, y0 + h), &c, true)?;
        }
        backend.draw_rect((x0, y0), (x0 + w, y0 + h), &RGBColor(0xdd, 0xdd, 0xdd), false)?;

        let label = self.style.pos(Pos::new(HPos::Center, VPos::Top));
        for (t, text) in self.labels() {
            let x = x0 + (t * w as f64).round() as i32;
            backend.draw_line((x, y0 + h), (x, y0 + h + 3), &BLACK)?;
            backend.draw_text(&text, &label, (x, y0 + h + 5))?;
        }
        Ok(())
    }
}

/// Plain text panel used for the loading indicator and the error panel.
pub struct MessagePanel<'a> {
    headline: String,
    headline_color: RGBColor,
    lines: Vec<String>,
    style: &'a TextStyle<'a>,
}

impl<'a> MessagePanel<'a> {
    pub fn loading(style: &'a TextStyle<'a>) -> MessagePanel<'a> {
        MessagePanel {
            headline: "Loading data...".to_string(),
            headline_color: BLACK,
            lines: Vec::new(),
            style,
        }
    }

    pub fn error(message: &str, attempts: &[(String, String)], style: &'a TextStyle<'a>) -> MessagePanel<'a> {
        let mut lines = Vec::new();
        if !attempts.is_empty() {
            lines.push("Tried paths:".to_string());
            lines.extend(attempts.iter().map(|(loc, cause)| format!("  {loc}: {cause}")));
        }
        MessagePanel {
            headline: format!("Error loading data: {message}"),
            headline_color: RGBColor(0xcc, 0x00, 0x00),
            lines,
            style,
        }
    }

    /// Failure after the data loaded, e.g. an unknown color in the initial filter.
    pub fn failed(message: &str, style: &'a TextStyle<'a>) -> MessagePanel<'a> {
        MessagePanel {
            headline: format!("Error: {message}"),
            headline_color: RGBColor(0xcc, 0x00, 0x00),
            lines: Vec::new(),
            style,
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.headline.as_str()).chain(self.lines.iter().map(|x| x.as_str()))
    }
}

impl<'a> PointCollection<'a, (i32, i32)> for &'a MessagePanel<'_> {
    type Point = &'a (i32, i32);
    type IntoIter = std::iter::Once<&'a (i32, i32)>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&(0, 0))
    }
}

impl<DB> Drawable<DB> for MessagePanel<'_>
where
    DB: DrawingBackend,
{
    fn draw<I>(&self, pos: I, backend: &mut DB, _: (u32, u32)) -> Result<(), DrawingErrorKind<DB::ErrorType>>
    where
        I: Iterator<Item = (i32, i32)>,
    {
        let mut pos = pos;
        let Some(pos) = pos.next() else {
            return Ok(());
        };
        let style = self.style.pos(Pos::new(HPos::Left, VPos::Top));
        let line_height = self.style.font.get_size() as i32 + 6;
        let (x, y) = (pos.0 + 20, pos.1 + 20);
        backend.draw_text(&self.headline, &style.color(&self.headline_color), (x, y))?;
        for (i, line) in self.lines.iter().enumerate() {
            backend.draw_text(line, &style, (x, y + (i as i32 + 1) * line_height))?;
        }
        Ok(())
    }
}

fn chart_layout(session: &ChartSession, config: &ChartConfig) -> LayoutElem {
    let m = config.margin;
    let scales = session.scales();
    let (pw, ph) = (scales.width.round() as u32, scales.height.round() as u32);
    let total = m.left + pw + m.right;
    LayoutElem::Vertical(vec![
        LayoutElem::rect("title", total, m.top),
        LayoutElem::Horizontal(vec![
            LayoutElem::rect("y_axis", m.left, ph),
            LayoutElem::rect("plot", pw, ph),
            LayoutElem::spacer(m.right, ph),
        ]),
        LayoutElem::Horizontal(vec![LayoutElem::spacer(m.left, m.bottom), LayoutElem::rect("x_axis", pw, m.bottom)]),
        LayoutElem::rect("controls", total, CONTROLS_HEIGHT),
        LayoutElem::rect("legend", total, LEGEND_HEIGHT),
    ])
}

pub fn draw_chart<DB>(root: DrawingArea<DB, Shift>, session: &ChartSession, config: &ChartConfig) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let app = ChartAppearance::from_config(config)?;
    let layout = chart_layout(session, config);
    let areas = StructuredDrawingArea::from_layout(root, &layout)?;
    let scales = session.scales();

    if let Some(area) = areas.get_area("title") {
        let x = config.margin.left as i32 + (scales.width / 2.0).round() as i32;
        let y = (config.margin.top as i32 - 30).max(0);
        let style = app.title_style.pos(Pos::new(HPos::Center, VPos::Center));
        area.draw_text(&config.title, &style, (x, y))?;
    }
    if let Some(area) = areas.get_area("plot") {
        area.draw(&HexLayer::new(session.scene(), session.binner(), &app))?;
    }
    if let Some(area) = areas.get_area("x_axis") {
        let axis = GeoAxis::new(&scales.x, Direction::Down, config.margin.left, &app.axis, format_longitude);
        area.draw(&axis)?;
    }
    if let Some(area) = areas.get_area("y_axis") {
        let axis = GeoAxis::new(&scales.y, Direction::Left, config.margin.left, &app.axis, format_latitude);
        area.draw(&axis)?;
    }
    if let Some(area) = areas.get_area("controls") {
        area.draw(&ControlStrip::new(session, &app.text_style))?;
    }
    if let Some(area) = areas.get_area("legend") {
        area.draw(&ColorLegend::new(session.color_map(), session.color_domain_max(), &app.text_style))?;
    }
    areas.present()?;
    Ok(())
}

pub fn draw_message<DB>(root: DrawingArea<DB, Shift>, panel: &MessagePanel) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    root.draw(panel)?;
    root.present()?;
    Ok(())
}

pub fn chart_dim(session: &ChartSession, config: &ChartConfig) -> (u32, u32) {
    chart_layout(session, config).get_dim()
}

/// Writes the chart to `path`, as SVG or PNG by extension.
pub fn plot(path: &Path, session: &ChartSession, config: &ChartConfig) -> Result<()> {
    let dim = chart_dim(session, config);
    match OutputFormat::from_path(path) {
        OutputFormat::Svg => draw_chart(SVGBackend::new(path, dim).into_drawing_area(), session, config)?,
        OutputFormat::Png => draw_chart(BitMapBackend::new(path, dim).into_drawing_area(), session, config)?,
    }
    log::info!("wrote {}", path.display());
    Ok(())
}

pub fn plot_message(path: &Path, panel: &MessagePanel, config: &ChartConfig) -> Result<()> {
    let dim = (config.width, config.height);
    match OutputFormat::from_path(path) {
        OutputFormat::Svg => draw_message(SVGBackend::new(path, dim).into_drawing_area(), panel),
        OutputFormat::Png => draw_message(BitMapBackend::new(path, dim).into_drawing_area(), panel),
    }
}
