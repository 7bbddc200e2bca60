pub mod axis;
pub mod color;
pub mod command;
pub mod config;
pub mod filter;
pub mod hexbin;
pub mod layout;
pub mod page;
pub mod plot;
pub mod scale;
pub mod scene;
pub mod session;
pub mod sighting;
pub mod source;

pub use color::SequentialColorMap;
pub use config::ChartConfig;
pub use filter::FilterState;
pub use hexbin::{Bin, HexBinner};
pub use page::{Page, PageState};
pub use session::{ChartEvent, ChartSession, SessionParams, aggregate};
pub use sighting::{Dataset, SightingPoint};
pub use source::{DataSource, DataUnavailable};
