// @file axis.rs
// @brief longitude / latitude axes

use crate::scale::LinearScale;
use plotters::element::{Drawable, PointCollection};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_backend::DrawingErrorKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Down,
    Left,
}

#[derive(Clone)]
pub struct AxisAppearance<'a> {
    pub tick_length: u32,
    pub label_setback: u32,
    pub desired_ticks: usize,
    pub label_style: TextStyle<'a>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Tick {
    pub pos: i32,
    pub label: String,
}

/// Ticks at round domain values that fall inside the pixel range.
pub(crate) fn build_ticks<F>(scale: &LinearScale, count: usize, formatter: F) -> Vec<Tick>
where
    F: Fn(f64) -> String,
{
    let (lo, hi) = if scale.range.0 <= scale.range.1 {
        scale.range
    } else {
        (scale.range.1, scale.range.0)
    };
    scale
        .ticks(count)
        .into_iter()
        .map(|v| (scale.map(v), v))
        .filter(|(px, _)| *px >= lo - 0.5 && *px <= hi + 0.5)
        .map(|(px, v)| Tick {
            pos: px.round() as i32,
            label: formatter(v),
        })
        .collect()
}

/// Axis line along the plot edge with outward ticks. A `Down` axis sits on the
/// top edge of its area; a `Left` axis on the right edge.
pub struct GeoAxis<'a> {
    ticks: Vec<Tick>,
    length: u32,
    direction: Direction,
    area_width: u32,
    app: &'a AxisAppearance<'a>,
}

impl<'a> GeoAxis<'a> {
    pub fn new<F>(scale: &LinearScale, direction: Direction, area_width: u32, app: &'a AxisAppearance<'a>, formatter: F) -> GeoAxis<'a>
    where
        F: Fn(f64) -> String,
    {
        let length = (scale.range.1 - scale.range.0).abs().round() as u32;
        GeoAxis {
            ticks: build_ticks(scale, app.desired_ticks, formatter),
            length,
            direction,
            area_width,
            app,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.ticks.iter().map(|x| x.label.as_str()).collect()
    }
}

impl<'a> PointCollection<'a, (i32, i32)> for &'a GeoAxis<'_> {
    type Point = &'a (i32, i32);
    type IntoIter = std::iter::Once<&'a (i32, i32)>;

    fn point_iter(self) -> Self::IntoIter {
        std::iter::once(&(0, 0))
    }
}

impl<DB> Drawable<DB> for GeoAxis<'_>
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
        let style = ShapeStyle {
            color: BLACK.into(),
            filled: false,
            stroke_width: 1,
        };
        let len = self.length as i32;
        let tick = self.app.tick_length as i32;
        let setback = self.app.label_setback as i32;

        match self.direction {
            Direction::Down => {
                backend.draw_line(pos, (pos.0 + len, pos.1), &style)?;
                let label_style = self.app.label_style.pos(Pos::new(HPos::Center, VPos::Top));
                for t in &self.ticks {
                    let x = pos.0 + t.pos;
                    backend.draw_line((x, pos.1), (x, pos.1 + tick), &style)?;
                    backend.draw_text(&t.label, &label_style, (x, pos.1 + tick + setback))?;
                }
            }
            Direction::Left => {
                let x = pos.0 + self.area_width as i32 - 1;
                backend.draw_line((x, pos.1), (x, pos.1 + len), &style)?;
                let label_style = self.app.label_style.pos(Pos::new(HPos::Right, VPos::Center));
                for t in &self.ticks {
                    let y = pos.1 + t.pos;
                    backend.draw_line((x - tick, y), (x, y), &style)?;
                    backend.draw_text(&t.label, &label_style, (x - tick - setback, y))?;
                }
            }
        }
        Ok(())
    }
}
