// @file color.rs
// @brief sequential count-to-color mapping

use anyhow::{Result, anyhow};
use hex_color::HexColor;
use plotters::prelude::RGBColor;

/// d3 "Blues" scheme, light to dark.
pub const BLUES: [&str; 9] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5", "#08519c", "#08306b",
];

pub fn parse_color(s: &str) -> Result<RGBColor> {
    let c = HexColor::parse(s.trim()).map_err(|e| anyhow!("invalid color {s:?}: {e}"))?;
    Ok(RGBColor(c.r, c.g, c.b))
}

#[derive(Clone, Debug, PartialEq)]
pub struct SequentialColorMap {
    pub stops: Vec<RGBColor>,
}

impl Default for SequentialColorMap {
    fn default() -> Self {
        let stops = BLUES.iter().filter_map(|x| parse_color(x).ok()).collect();
        SequentialColorMap { stops }
    }
}

impl SequentialColorMap {
    pub fn from_hex(palette: &[String]) -> Result<SequentialColorMap> {
        if palette.is_empty() {
            return Err(anyhow!("palette must have at least one color"));
        }
        let stops = palette.iter().map(|x| parse_color(x)).collect::<Result<Vec<_>>>()?;
        Ok(SequentialColorMap { stops })
    }

    /// Domain is `[0, max_count]`; a zero domain maps everything to the first stop.
    pub fn to_picker(&self, max_count: usize) -> ColorPicker {
        ColorPicker {
            map: self.clone(),
            max_count,
        }
    }

    /// Color at `t` in `[0, 1]`, interpolated linearly between stops.
    pub fn interpolate(&self, t: f64) -> RGBColor {
        let n = self.stops.len();
        if n <= 1 || !t.is_finite() {
            return self.stops.first().copied().unwrap_or(RGBColor(0, 0, 0));
        }
        let t = t.clamp(0.0, 1.0) * (n - 1) as f64;
        let i = (t.floor() as usize).min(n - 2);
        let f = t - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * f).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }
}

#[derive(Clone, Debug)]
pub struct ColorPicker {
    map: SequentialColorMap,
    max_count: usize,
}

impl ColorPicker {
    pub fn max_count(&self) -> usize {
        self.max_count
    }

    pub fn get_color(&self, count: usize) -> RGBColor {
        if self.max_count == 0 {
            return self.map.interpolate(0.0);
        }
        self.map.interpolate(count as f64 / self.max_count as f64)
    }
}
