// @file session.rs
// @brief chart session: dataset, scales, filter and scene for one chart

use crate::color::SequentialColorMap;
use crate::filter::{FilterState, UnknownCategory};
use crate::hexbin::{Bin, HexBinner};
use crate::scale::{GeoScales, fit_aspect};
use crate::scene::{Reconciliation, Scene};
use crate::sighting::{Dataset, SightingPoint};

#[derive(Clone, Debug, PartialEq)]
pub enum ChartEvent {
    Toggle(String),
    Set(String, bool),
    SelectAll,
    ClearAll,
    /// pointer position in plot pixels
    Hover(f64, f64),
    PointerOut,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SessionParams {
    pub radius: f64,
    pub padding: f64,
    pub fit_aspect: bool,
    /// base plot box in pixels
    pub width: f64,
    pub height: f64,
}

impl Default for SessionParams {
    fn default() -> Self {
        SessionParams {
            radius: 8.0,
            padding: 0.05,
            fit_aspect: true,
            width: 880.0,
            height: 500.0,
        }
    }
}

/// Bins the points whose fur color is selected.
pub fn aggregate<'a>(
    points: &'a [SightingPoint],
    filter: &FilterState,
    scales: &GeoScales,
    binner: &HexBinner,
) -> Vec<Bin<&'a SightingPoint>> {
    binner.bin(points.iter().filter(|p| filter.is_selected(&p.fur_color)), |p| scales.project(p))
}

pub struct ChartSession {
    dataset: Dataset,
    scales: GeoScales,
    binner: HexBinner,
    filter: FilterState,
    color_map: SequentialColorMap,
    color_domain_max: usize,
    scene: Scene,
    redraws: usize,
}

impl ChartSession {
    /// Scales and the outline layer come from the full dataset and are not
    /// recomputed afterwards. Performs the initial redraw.
    pub fn new(dataset: Dataset, params: &SessionParams, color_map: SequentialColorMap) -> ChartSession {
        let (width, height) = match dataset.extent() {
            Some(extent) if params.fit_aspect => fit_aspect(extent, params.width, params.height),
            _ => (params.width, params.height),
        };
        let scales = GeoScales::from_dataset(&dataset, params.padding, width, height);
        let binner = HexBinner::new(params.radius);
        let outline = binner
            .bin(dataset.points().iter(), |p| scales.project(p))
            .iter()
            .map(|b| (b.x, b.y))
            .collect::<Vec<_>>();
        log::debug!("plot area {width:.0}x{height:.0}, {} outline cells", outline.len());

        let filter = FilterState::new(dataset.fur_colors());
        let mut session = ChartSession {
            dataset,
            scales,
            binner,
            filter,
            color_map,
            color_domain_max: 0,
            scene: Scene::with_outline(outline),
            redraws: 0,
        };
        session.redraw();
        session
    }

    pub fn active_bins(&self) -> Vec<Bin<&SightingPoint>> {
        aggregate(self.dataset.points(), &self.filter, &self.scales, &self.binner)
    }

    pub fn redraw(&mut self) -> Reconciliation {
        let bins = aggregate(self.dataset.points(), &self.filter, &self.scales, &self.binner);
        self.color_domain_max = bins.iter().map(|b| b.count()).max().unwrap_or(0);
        let picker = self.color_map.to_picker(self.color_domain_max);
        let r = self.scene.reconcile(&bins, &picker);
        self.redraws += 1;
        log::debug!(
            "redraw #{}: selected {:?}, {} bins, color domain [0, {}], {:?}",
            self.redraws,
            self.filter.selected(),
            bins.len(),
            self.color_domain_max,
            r
        );
        r
    }

    /// Applies one UI event; filter changes trigger a redraw.
    pub fn handle(&mut self, event: &ChartEvent) -> Result<Option<Reconciliation>, UnknownCategory> {
        let changed = match event {
            ChartEvent::Toggle(c) => {
                self.filter.toggle(c)?;
                true
            }
            ChartEvent::Set(c, s) => self.filter.set(c, *s)?,
            ChartEvent::SelectAll => self.filter.select_all(),
            ChartEvent::ClearAll => self.filter.clear_all(),
            ChartEvent::Hover(x, y) => {
                self.hover(*x, *y);
                false
            }
            ChartEvent::PointerOut => {
                self.pointer_out();
                false
            }
        };
        Ok(if changed { Some(self.redraw()) } else { None })
    }

    /// Hit-tests a plot pixel position; returns whether a hexagon is under it.
    pub fn hover(&mut self, x: f64, y: f64) -> bool {
        self.scene.hover(&self.binner, x, y)
    }

    pub fn pointer_out(&mut self) {
        self.scene.pointer_out();
    }

    pub fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn scales(&self) -> &GeoScales {
        &self.scales
    }

    pub fn binner(&self) -> &HexBinner {
        &self.binner
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn color_map(&self) -> &SequentialColorMap {
        &self.color_map
    }

    pub fn color_domain_max(&self) -> usize {
        self.color_domain_max
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn redraw_count(&self) -> usize {
        self.redraws
    }
}
