// @file layout.rs
// @brief box layout on top of plotters drawing areas

use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::HashMap;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutMargin {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl LayoutMargin {
    pub fn new(left: u32, right: u32, top: u32, bottom: u32) -> LayoutMargin {
        LayoutMargin { left, right, top, bottom }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutElem {
    Rect { id: Option<String>, width: u32, height: u32 },
    Horizontal(Vec<LayoutElem>),
    Vertical(Vec<LayoutElem>),
    Margined { margin: LayoutMargin, center: Box<LayoutElem> },
}

impl LayoutElem {
    pub fn rect(id: &str, width: u32, height: u32) -> LayoutElem {
        LayoutElem::Rect {
            id: Some(id.to_string()),
            width,
            height,
        }
    }

    pub fn spacer(width: u32, height: u32) -> LayoutElem {
        LayoutElem::Rect { id: None, width, height }
    }

    pub fn get_dim(&self) -> (u32, u32) {
        match self {
            LayoutElem::Rect { width, height, .. } => (*width, *height),
            LayoutElem::Horizontal(inner) => inner
                .iter()
                .map(|x| x.get_dim())
                .fold((0, 0), |acc, (w, h)| (acc.0 + w, acc.1.max(h))),
            LayoutElem::Vertical(inner) => inner
                .iter()
                .map(|x| x.get_dim())
                .fold((0, 0), |acc, (w, h)| (acc.0.max(w), acc.1 + h)),
            LayoutElem::Margined { margin, center } => {
                let (w, h) = center.get_dim();
                (w + margin.left + margin.right, h + margin.top + margin.bottom)
            }
        }
    }

    /// Inner split positions along x and y, excluding both ends.
    fn get_breakpoints(&self) -> (Vec<u32>, Vec<u32>) {
        let accumulate = |dims: Vec<u32>| {
            let mut acc = 0;
            let mut v = Vec::new();
            for d in &dims[..dims.len().saturating_sub(1)] {
                acc += d;
                v.push(acc);
            }
            v
        };
        match self {
            LayoutElem::Rect { .. } => (Vec::new(), Vec::new()),
            LayoutElem::Horizontal(inner) => (accumulate(inner.iter().map(|x| x.get_dim().0).collect()), Vec::new()),
            LayoutElem::Vertical(inner) => (Vec::new(), accumulate(inner.iter().map(|x| x.get_dim().1).collect())),
            LayoutElem::Margined { margin, center } => {
                let (w, h) = center.get_dim();
                (
                    vec![margin.left, margin.left + w],
                    vec![margin.top, margin.top + h],
                )
            }
        }
    }
}

/// Drawing areas of a layout, addressable by rect id.
pub struct StructuredDrawingArea<DB: DrawingBackend> {
    root: DrawingArea<DB, Shift>,
    index: HashMap<String, DrawingArea<DB, Shift>>,
}

impl<DB> StructuredDrawingArea<DB>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    fn append_elem(&mut self, area: &DrawingArea<DB, Shift>, layout: &LayoutElem) -> Result<()> {
        let (wbrk, hbrk) = layout.get_breakpoints();
        match layout {
            LayoutElem::Rect { id: Some(id), .. } => {
                if self.index.insert(id.clone(), area.clone()).is_some() {
                    return Err(anyhow!("duplicate layout id: {id}"));
                }
            }
            LayoutElem::Rect { id: None, .. } => {}
            LayoutElem::Horizontal(inner) | LayoutElem::Vertical(inner) => {
                let areas = area.split_by_breakpoints(&wbrk, &hbrk);
                for (inner, area) in inner.iter().zip(areas.iter()) {
                    self.append_elem(area, inner)?;
                }
            }
            LayoutElem::Margined { center, .. } => {
                // 3x3 grid; index 4 is the center cell
                let areas = area.split_by_breakpoints(&wbrk, &hbrk);
                if let Some(area) = areas.get(4) {
                    self.append_elem(area, center)?;
                }
            }
        }
        Ok(())
    }

    pub fn from_layout(root: DrawingArea<DB, Shift>, layout: &LayoutElem) -> Result<StructuredDrawingArea<DB>> {
        root.fill(&WHITE)?;
        let mut s = StructuredDrawingArea {
            root: root.clone(),
            index: HashMap::new(),
        };
        s.append_elem(&root, layout)?;
        Ok(s)
    }

    pub fn get_area(&self, id: &str) -> Option<&DrawingArea<DB, Shift>> {
        self.index.get(id)
    }

    pub fn present(&self) -> Result<()> {
        self.root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> LayoutElem {
        LayoutElem::Vertical(vec![
            LayoutElem::rect("title", 300, 40),
            LayoutElem::Horizontal(vec![LayoutElem::rect("left", 50, 200), LayoutElem::rect("plot", 250, 200)]),
            LayoutElem::Margined {
                margin: LayoutMargin::new(5, 5, 10, 0),
                center: Box::new(LayoutElem::rect("legend", 100, 20)),
            },
        ])
    }

    #[test]
    fn test_dim() {
        assert_eq!(page().get_dim(), (300, 270));
    }

    #[test]
    fn test_breakpoints() {
        let layout = page();
        assert_eq!(layout.get_breakpoints(), (vec![], vec![40, 240]));
        if let LayoutElem::Vertical(inner) = &layout {
            assert_eq!(inner[1].get_breakpoints(), (vec![50], vec![]));
            assert_eq!(inner[2].get_breakpoints(), (vec![5, 105], vec![10, 30]));
        }
    }

    #[test]
    fn test_areas_resolve() {
        let layout = page();
        let (w, h) = layout.get_dim();
        let mut buf = vec![0u8; (w * h * 3) as usize];
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        let areas = StructuredDrawingArea::from_layout(root, &layout).unwrap();
        assert_eq!(areas.get_area("plot").unwrap().dim_in_pixel(), (250, 200));
        assert_eq!(areas.get_area("legend").unwrap().dim_in_pixel(), (100, 20));
        assert!(areas.get_area("missing").is_none());
    }
}
