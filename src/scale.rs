// @file scale.rs
// @brief linear coordinate-to-pixel scales

use crate::sighting::{Dataset, SightingPoint};

const MIN_SPAN: f64 = 1e-6;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale { domain, range }
    }

    fn domain_span(&self) -> f64 {
        let span = self.domain.1 - self.domain.0;
        if span.abs() < MIN_SPAN { MIN_SPAN } else { span }
    }

    pub fn map(&self, v: f64) -> f64 {
        let t = (v - self.domain.0) / self.domain_span();
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    pub fn invert(&self, px: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        if span == 0.0 {
            return self.domain.0;
        }
        self.domain.0 + (px - self.range.0) / span * self.domain_span()
    }

    /// Round tick values inside the domain, stepping by 1, 2 or 5 times a power of ten.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || hi - lo < MIN_SPAN {
            return vec![lo];
        }
        let raw = (hi - lo) / count as f64;
        let power = 10f64.powf(raw.log10().floor());
        let step = match raw / power {
            r if r >= 50f64.sqrt() => 10.0 * power,
            r if r >= 10f64.sqrt() => 5.0 * power,
            r if r >= 2f64.sqrt() => 2.0 * power,
            _ => power,
        };
        let start = (lo / step - 1e-9).ceil() as i64;
        let end = (hi / step + 1e-9).floor() as i64;
        if step < 1.0 {
            // i / 100 rather than i * 0.01
            let inv = (1.0 / step).round();
            (start..=end).map(|i| i as f64 / inv).collect()
        } else {
            (start..=end).map(|i| i as f64 * step).collect()
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoScales {
    pub x: LinearScale,
    pub y: LinearScale,
    pub width: f64,
    pub height: f64,
}

impl GeoScales {
    /// Builds scales over a `((lon_min, lon_max), (lat_min, lat_max))` extent,
    /// each axis padded by `padding` times its span. Latitude is inverted so
    /// that north is up.
    pub fn from_extent(extent: ((f64, f64), (f64, f64)), padding: f64, width: f64, height: f64) -> GeoScales {
        let ((x0, x1), (y0, y1)) = extent;
        let xpad = (x1 - x0) * padding;
        let ypad = (y1 - y0) * padding;
        GeoScales {
            x: LinearScale::new((x0 - xpad, x1 + xpad), (0.0, width)),
            y: LinearScale::new((y0 - ypad, y1 + ypad), (height, 0.0)),
            width,
            height,
        }
    }

    pub fn from_dataset(dataset: &Dataset, padding: f64, width: f64, height: f64) -> GeoScales {
        let extent = dataset.extent().unwrap_or(((0.0, 1.0), (0.0, 1.0)));
        GeoScales::from_extent(extent, padding, width, height)
    }

    pub fn project(&self, p: &SightingPoint) -> (f64, f64) {
        (self.x.map(p.longitude), self.y.map(p.latitude))
    }

    pub fn unproject(&self, px: f64, py: f64) -> (f64, f64) {
        (self.x.invert(px), self.y.invert(py))
    }
}

/// Shrinks one side of the base box so that its aspect matches the data extent.
pub fn fit_aspect(extent: ((f64, f64), (f64, f64)), width: f64, height: f64) -> (f64, f64) {
    let ((x0, x1), (y0, y1)) = extent;
    let (dx, dy) = ((x1 - x0).abs(), (y1 - y0).abs());
    if dx < MIN_SPAN || dy < MIN_SPAN {
        return (width, height);
    }
    let ratio = dx / dy;
    if width / height > ratio {
        (height * ratio, height)
    } else {
        (width, width / ratio)
    }
}

pub fn format_longitude(v: f64) -> String {
    let direction = if v < 0.0 { "W" } else { "E" };
    format!("{:.2}°{direction}", v.abs())
}

pub fn format_latitude(v: f64) -> String {
    let direction = if v < 0.0 { "S" } else { "N" };
    format!("{:.2}°{direction}", v.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_map_and_invert() {
        let s = LinearScale::new((10.0, 20.0), (0.0, 100.0));
        assert_relative_eq!(s.map(15.0), 50.0);
        assert_relative_eq!(s.invert(25.0), 12.5);

        let inv = LinearScale::new((0.0, 1.0), (300.0, 0.0));
        assert_relative_eq!(inv.map(0.0), 300.0);
        assert_relative_eq!(inv.map(1.0), 0.0);
    }

    #[test]
    fn test_degenerate_domain_is_finite() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert!(s.map(5.0).is_finite());
        assert_eq!(s.ticks(5), vec![5.0]);
    }

    #[test]
    fn test_padding_and_orientation() {
        let g = GeoScales::from_extent(((-74.0, -73.0), (40.0, 41.0)), 0.05, 200.0, 100.0);
        assert_relative_eq!(g.x.domain.0, -74.05, epsilon = 1e-9);
        assert_relative_eq!(g.y.domain.1, 41.05, epsilon = 1e-9);
        let (px, py) = g.project(&SightingPoint::new(-73.5, 41.05, "Gray"));
        assert_relative_eq!(px, 100.0, epsilon = 1e-9);
        assert_relative_eq!(py, 0.0, epsilon = 1e-9);
        let (lon, lat) = g.unproject(100.0, 50.0);
        assert_relative_eq!(lon, -73.5, epsilon = 1e-9);
        assert_relative_eq!(lat, 40.5, epsilon = 1e-9);
    }

    #[test]
    fn test_ticks() {
        let s = LinearScale::new((-73.982, -73.948), (0.0, 500.0));
        let ticks = s.ticks(5);
        assert_eq!(ticks.len(), 7);
        assert_relative_eq!(ticks[0], -73.98, epsilon = 1e-9);
        assert_relative_eq!(ticks[1], -73.975, epsilon = 1e-9);
        assert_relative_eq!(ticks[6], -73.95, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_aspect() {
        assert_eq!(fit_aspect(((0.0, 1.0), (0.0, 1.0)), 880.0, 500.0), (500.0, 500.0));
        assert_eq!(fit_aspect(((0.0, 4.0), (0.0, 1.0)), 880.0, 500.0), (880.0, 220.0));
    }

    #[test]
    fn test_format() {
        assert_eq!(format_longitude(-73.968), "73.97°W");
        assert_eq!(format_latitude(40.7812), "40.78°N");
        assert_eq!(format_latitude(-1.0), "1.00°S");
    }
}
