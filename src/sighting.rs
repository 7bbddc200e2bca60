// @file sighting.rs
// @brief sighting records and the in-memory dataset

use anyhow::{Result, anyhow};
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct SightingPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub fur_color: String,
}

impl SightingPoint {
    pub fn new(longitude: f64, latitude: f64, fur_color: &str) -> SightingPoint {
        SightingPoint {
            longitude,
            latitude,
            fur_color: fur_color.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawSighting {
    longitude: Option<f64>,
    latitude: Option<f64>,
    #[serde(rename = "furColor")]
    fur_color: Option<String>,
}

impl RawSighting {
    fn validate(value: serde_json::Value) -> Option<SightingPoint> {
        let raw: RawSighting = serde_json::from_value(value).ok()?;
        raw.into_point()
    }

    fn into_point(self) -> Option<SightingPoint> {
        let longitude = self.longitude.filter(|x| x.is_finite())?;
        let latitude = self.latitude.filter(|x| x.is_finite())?;
        let fur_color = self.fur_color.filter(|x| !x.trim().is_empty())?;
        Some(SightingPoint {
            longitude,
            latitude,
            fur_color,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct Dataset {
    points: Vec<SightingPoint>,
    fur_colors: Vec<String>,
}

impl Dataset {
    pub fn new(points: Vec<SightingPoint>) -> Dataset {
        let mut fur_colors: Vec<String> = Vec::new();
        for p in &points {
            if !fur_colors.contains(&p.fur_color) {
                fur_colors.push(p.fur_color.clone());
            }
        }
        Dataset { points, fur_colors }
    }

    /// Parses a JSON array of `{longitude, latitude, furColor}` records.
    /// Elements that are not such a record, or that carry a missing, mistyped
    /// or non-finite field, are dropped.
    pub fn from_json(text: &str) -> Result<Dataset> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;
        let total = raw.len();
        let points = raw.into_iter().filter_map(RawSighting::validate).collect::<Vec<_>>();
        if points.len() < total {
            log::warn!("dropped {} of {} records with missing or invalid fields", total - points.len(), total);
        }
        if points.is_empty() {
            return Err(anyhow!("no valid sighting records in {total} entries"));
        }
        Ok(Dataset::new(points))
    }

    pub fn points(&self) -> &[SightingPoint] {
        &self.points
    }

    /// Distinct fur colors in first-seen order.
    pub fn fur_colors(&self) -> &[String] {
        &self.fur_colors
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `((lon_min, lon_max), (lat_min, lat_max))`, or `None` for an empty dataset.
    pub fn extent(&self) -> Option<((f64, f64), (f64, f64))> {
        let first = self.points.first()?;
        let init = ((first.longitude, first.longitude), (first.latitude, first.latitude));
        Some(self.points.iter().fold(init, |((x0, x1), (y0, y1)), p| {
            ((x0.min(p.longitude), x1.max(p.longitude)), (y0.min(p.latitude), y1.max(p.latitude)))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_first_seen_colors() {
        let text = r#"[
            {"longitude": -73.97, "latitude": 40.78, "furColor": "Gray"},
            {"longitude": -73.96, "latitude": 40.77, "furColor": "Cinnamon"},
            {"longitude": -73.95, "latitude": 40.79, "furColor": "Gray", "extra": 1},
            {"longitude": -73.94, "latitude": 40.76, "furColor": "Black"}
        ]"#;
        let dataset = Dataset::from_json(text).unwrap();
        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.fur_colors(), &["Gray", "Cinnamon", "Black"]);
        assert_eq!(dataset.extent(), Some(((-73.97, -73.94), (40.76, 40.79))));
    }

    #[test]
    fn test_drops_malformed_records() {
        let text = r#"[
            {"longitude": -73.97, "latitude": 40.78, "furColor": "Gray"},
            {"latitude": 40.78, "furColor": "Gray"},
            {"longitude": -73.97, "latitude": 40.78},
            {"longitude": -73.97, "latitude": null, "furColor": "Black"},
            {"longitude": -73.97, "latitude": 40.78, "furColor": " "}
        ]"#;
        let dataset = Dataset::from_json(text).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.fur_colors(), &["Gray"]);
    }

    #[test]
    fn test_drops_mistyped_and_non_object_elements() {
        let text = r#"[
            {"longitude": -73.97, "latitude": "40.77", "furColor": "Gray"},
            {"longitude": -73.97, "latitude": 40.78, "furColor": 3},
            null,
            "Gray",
            [1, 2],
            {"longitude": -73.96, "latitude": 40.77, "furColor": "Cinnamon"}
        ]"#;
        let dataset = Dataset::from_json(text).unwrap();
        assert_eq!(dataset.points(), &[SightingPoint::new(-73.96, 40.77, "Cinnamon")]);

        assert!(Dataset::from_json(r#"[null, {"longitude": "x"}]"#).is_err());
    }

    #[test]
    fn test_rejects_non_array_and_empty() {
        assert!(Dataset::from_json(r#"{"longitude": 1.0}"#).is_err());
        assert!(Dataset::from_json("[]").is_err());
        assert!(Dataset::from_json(r#"[{"furColor": "Gray"}]"#).is_err());
    }

    #[test]
    fn test_extent_empty() {
        assert_eq!(Dataset::default().extent(), None);
    }
}
