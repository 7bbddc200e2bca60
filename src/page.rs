// @file page.rs
// @brief page lifecycle: loading, loaded, interactive, or error

use crate::color::SequentialColorMap;
use crate::session::{ChartSession, SessionParams};
use crate::source::{DataSource, DataUnavailable, load_first};
use anyhow::{Result, anyhow};

pub enum PageState {
    Loading,
    Loaded(ChartSession),
    Interactive(ChartSession),
    Error(DataUnavailable),
}

impl PageState {
    pub fn name(&self) -> &'static str {
        match self {
            PageState::Loading => "loading",
            PageState::Loaded(_) => "loaded",
            PageState::Interactive(_) => "interactive",
            PageState::Error(_) => "error",
        }
    }
}

pub struct Page {
    state: PageState,
}

impl Default for Page {
    fn default() -> Self {
        Page::new()
    }
}

impl Page {
    pub fn new() -> Page {
        Page {
            state: PageState::Loading,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    /// Fetches the dataset and builds the session. Only valid while loading;
    /// on failure the page ends in the error state.
    pub fn load(&mut self, sources: &[DataSource], params: &SessionParams, color_map: SequentialColorMap) -> Result<()> {
        if !matches!(self.state, PageState::Loading) {
            return Err(anyhow!("cannot load data in {} state", self.state.name()));
        }
        self.state = match load_first(sources) {
            Ok((_, dataset)) => PageState::Loaded(ChartSession::new(dataset, params, color_map)),
            Err(e) => {
                log::error!("{e}");
                PageState::Error(e)
            }
        };
        Ok(())
    }

    /// Starts accepting UI events once the initial chart is drawn.
    pub fn attach(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.state, PageState::Loading) {
            PageState::Loaded(session) => {
                self.state = PageState::Interactive(session);
                Ok(())
            }
            other => {
                let name = other.name();
                self.state = other;
                Err(anyhow!("cannot attach handlers in {name} state"))
            }
        }
    }

    pub fn session(&self) -> Option<&ChartSession> {
        match &self.state {
            PageState::Loaded(s) | PageState::Interactive(s) => Some(s),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut ChartSession> {
        match &mut self.state {
            PageState::Loaded(s) | PageState::Interactive(s) => Some(s),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DataUnavailable> {
        match &self.state {
            PageState::Error(e) => Some(e),
            _ => None,
        }
    }
}
