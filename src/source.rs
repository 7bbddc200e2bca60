// @file source.rs
// @brief dataset sources with ordered fallback

use crate::sighting::Dataset;
use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/JiayiD8/squirrels_in_central_park/refs/heads/main/scripts/squirrel_coords.json";

pub const DEFAULT_LOCAL_PATHS: [&str; 4] = [
    "./scripts/squirrel_coords.json",
    "../scripts/squirrel_coords.json",
    "/scripts/squirrel_coords.json",
    "scripts/squirrel_coords.json",
];

#[derive(Clone, Debug, PartialEq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    pub fn parse(location: &str) -> DataSource {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }

    fn fetch(&self) -> Result<String> {
        match self {
            DataSource::Url(url) => {
                let resp = ureq::get(url).call().with_context(|| format!("GET {url}"))?;
                Ok(resp.into_string()?)
            }
            DataSource::Path(path) => {
                std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    pub fn load(&self) -> Result<Dataset> {
        let text = self.fetch()?;
        Dataset::from_json(&text).with_context(|| format!("failed to parse {self}"))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Error)]
#[error("could not load sighting data from any of {} location(s)", .attempts.len())]
pub struct DataUnavailable {
    pub attempts: Vec<(String, String)>,
}

impl DataUnavailable {
    pub fn locations(&self) -> Vec<&str> {
        self.attempts.iter().map(|(loc, _)| loc.as_str()).collect()
    }
}

/// Tries each source in order and returns the first dataset that loads.
pub fn load_first(sources: &[DataSource]) -> Result<(DataSource, Dataset), DataUnavailable> {
    let mut attempts = Vec::new();
    for source in sources {
        log::info!("trying to load data from {source}");
        match source.load() {
            Ok(dataset) => {
                log::info!("loaded {} sightings from {source}", dataset.len());
                return Ok((source.clone(), dataset));
            }
            Err(e) => {
                log::warn!("failed to load from {source}: {e:#}");
                attempts.push((source.to_string(), format!("{e:#}")));
            }
        }
    }
    Err(DataUnavailable { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"[{"longitude": -73.97, "latitude": 40.78, "furColor": "Gray"}]"#;

    #[test]
    fn test_parse_location() {
        assert_eq!(
            DataSource::parse("https://example.com/a.json"),
            DataSource::Url("https://example.com/a.json".to_string())
        );
        assert_eq!(
            DataSource::parse("./scripts/a.json"),
            DataSource::Path(PathBuf::from("./scripts/a.json"))
        );
    }

    #[test]
    fn test_fallback_stops_at_first_success() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("squirrel_coords.json");
        std::fs::write(&good, DATA).unwrap();
        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "not json").unwrap();

        let sources = vec![
            DataSource::Path(dir.path().join("missing1.json")),
            DataSource::Path(broken),
            DataSource::Path(dir.path().join("missing2.json")),
            DataSource::Path(good.clone()),
            DataSource::Path(dir.path().join("never_tried.json")),
        ];
        let (source, dataset) = load_first(&sources).unwrap();
        assert_eq!(source, DataSource::Path(good));
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_all_sources_fail() {
        let dir = tempfile::tempdir().unwrap();
        let sources = (0..4)
            .map(|i| DataSource::Path(dir.path().join(format!("missing{i}.json"))))
            .collect::<Vec<_>>();
        let err = load_first(&sources).unwrap_err();
        let expected = sources.iter().map(|x| x.to_string()).collect::<Vec<_>>();
        assert_eq!(err.locations(), expected.iter().map(|x| x.as_str()).collect::<Vec<_>>());
        assert!(err.to_string().contains("4 location(s)"));
    }
}
