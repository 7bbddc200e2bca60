// @file config.rs
// @brief chart appearance and data source configuration

use crate::color::{BLUES, SequentialColorMap, parse_color};
use crate::source::{DEFAULT_LOCAL_PATHS, DataSource};
use anyhow::{Context, Result};
use plotters::prelude::RGBColor;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for Margin {
    fn default() -> Self {
        Margin {
            top: 60,
            right: 60,
            bottom: 40,
            left: 60,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// outer size including margins
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub radius: f64,
    pub padding: f64,
    pub fit_aspect: bool,
    pub title: String,
    pub palette: Vec<String>,
    pub outline_color: String,
    pub stroke_color: String,
    pub font_family: String,
    pub font_size: u32,
    pub sources: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            width: 1000,
            height: 600,
            margin: Margin::default(),
            radius: 8.0,
            padding: 0.05,
            fit_aspect: true,
            title: "Squirrel Locations by Fur Color in Central Park".to_string(),
            palette: BLUES.iter().map(|x| x.to_string()).collect(),
            outline_color: "#ddd".to_string(),
            stroke_color: "#fff".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            sources: DEFAULT_LOCAL_PATHS.iter().map(|x| x.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub color_map: SequentialColorMap,
    pub outline: RGBColor,
    pub stroke: RGBColor,
}

impl ChartConfig {
    pub fn load(path: &Path) -> Result<ChartConfig> {
        let text = std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
        let config: ChartConfig =
            serde_yaml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.radius > 0.0, "radius must be positive, got {}", self.radius);
        anyhow::ensure!(self.padding >= 0.0, "padding must not be negative, got {}", self.padding);
        let (w, h) = self.plot_size();
        anyhow::ensure!(w > 0 && h > 0, "margins leave no room for the plot");
        self.style()?;
        Ok(())
    }

    /// Base plot box, before aspect fitting.
    pub fn plot_size(&self) -> (u32, u32) {
        (
            self.width.saturating_sub(self.margin.left + self.margin.right),
            self.height.saturating_sub(self.margin.top + self.margin.bottom),
        )
    }

    pub fn style(&self) -> Result<ResolvedStyle> {
        Ok(ResolvedStyle {
            color_map: SequentialColorMap::from_hex(&self.palette)?,
            outline: parse_color(&self.outline_color)?,
            stroke: parse_color(&self.stroke_color)?,
        })
    }

    pub fn data_sources(&self) -> Vec<DataSource> {
        self.sources.iter().map(|x| DataSource::parse(x)).collect()
    }
}
