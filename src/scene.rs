// @file scene.rs
// @brief retained hexagon shapes, positional reconciliation and tooltips

use crate::color::ColorPicker;
use crate::hexbin::{Bin, HexBinner};
use crate::sighting::SightingPoint;
use plotters::prelude::RGBColor;

pub const TOOLTIP_OFFSET: (f64, f64) = (10.0, -28.0);

#[derive(Clone, Debug, PartialEq)]
pub struct HexShape {
    pub x: f64,
    pub y: f64,
    pub fill: RGBColor,
    pub count: usize,
    /// (fur color, count) in first-seen order within the bin
    pub breakdown: Vec<(String, usize)>,
}

impl HexShape {
    fn assign(&mut self, bin: &Bin<&SightingPoint>, picker: &ColorPicker) {
        self.x = bin.x;
        self.y = bin.y;
        self.count = bin.count();
        self.fill = picker.get_color(self.count);
        self.breakdown = breakdown(&bin.members);
    }
}

pub fn breakdown(members: &[&SightingPoint]) -> Vec<(String, usize)> {
    let mut v: Vec<(String, usize)> = Vec::new();
    for m in members {
        if let Some(e) = v.iter_mut().find(|(name, _)| *name == m.fur_color) {
            e.1 += 1;
        } else {
            v.push((m.fur_color.clone(), 1));
        }
    }
    v
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
}

impl Tooltip {
    fn for_shape(shape: &HexShape, px: f64, py: f64) -> Tooltip {
        let mut lines = vec![format!("Total: {} squirrels", shape.count)];
        lines.extend(shape.breakdown.iter().map(|(name, n)| format!("{name}: {n}")));
        Tooltip {
            x: px + TOOLTIP_OFFSET.0,
            y: py + TOOLTIP_OFFSET.1,
            lines,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub entered: usize,
    pub updated: usize,
    pub exited: usize,
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub outline: Vec<(f64, f64)>,
    pub active: Vec<HexShape>,
    pub hovered: Option<usize>,
    pub tooltip: Option<Tooltip>,
}

impl Scene {
    pub fn with_outline(outline: Vec<(f64, f64)>) -> Scene {
        Scene {
            outline,
            ..Default::default()
        }
    }

    /// Matches shapes to bins by index: extra shapes are removed, missing
    /// ones appended, and survivors get new position, fill and contents.
    pub fn reconcile(&mut self, bins: &[Bin<&SightingPoint>], picker: &ColorPicker) -> Reconciliation {
        let exited = self.active.len().saturating_sub(bins.len());
        self.active.truncate(bins.len());
        let updated = self.active.len();

        for (shape, bin) in self.active.iter_mut().zip(bins) {
            shape.assign(bin, picker);
        }
        for bin in &bins[updated..] {
            let mut shape = HexShape {
                x: 0.0,
                y: 0.0,
                fill: RGBColor(0, 0, 0),
                count: 0,
                breakdown: Vec::new(),
            };
            shape.assign(bin, picker);
            self.active.push(shape);
        }

        // shape identity does not survive a redraw
        self.pointer_out();
        Reconciliation {
            entered: bins.len() - updated,
            updated,
            exited,
        }
    }

    pub fn hit_test(&self, binner: &HexBinner, px: f64, py: f64) -> Option<usize> {
        self.active.iter().position(|s| binner.contains((s.x, s.y), px, py))
    }

    /// Shows the tooltip for the shape under the pointer; returns whether one was hit.
    pub fn hover(&mut self, binner: &HexBinner, px: f64, py: f64) -> bool {
        self.hovered = self.hit_test(binner, px, py);
        self.tooltip = self.hovered.map(|i| Tooltip::for_shape(&self.active[i], px, py));
        self.hovered.is_some()
    }

    pub fn pointer_out(&mut self) {
        self.hovered = None;
        self.tooltip = None;
    }
}
