//! Dataset locations per city.

use crate::city::City;
use crate::error::{ExploreError, Result};
use crate::record::RecordSet;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the directory that holds the city CSVs.
pub const DATA_DIR_ENV: &str = "BIKESHARE_DATA_DIR";

/// Maps each [`City`] to its CSV file inside a data directory.
///
/// File names default to [`City::default_file`] and may be overridden from a
/// JSON object keyed by city selector:
/// ```json
/// {
///   "chicago": "chicago_2017.csv",
///   "new york": "/srv/bikeshare/nyc.csv"
/// }
/// ```
/// Relative names resolve against the data directory.
#[derive(Debug, Clone)]
pub struct CityCatalog {
    data_dir: PathBuf,
    files: BTreeMap<City, PathBuf>,
}

impl CityCatalog {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let files = City::ALL
            .into_iter()
            .map(|city| (city, PathBuf::from(city.default_file())))
            .collect();
        CityCatalog {
            data_dir: data_dir.into(),
            files,
        }
    }

    /// Uses `BIKESHARE_DATA_DIR` when set, the working directory otherwise.
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| ".".to_string());
        Self::new(data_dir)
    }

    /// Applies per-city file overrides from a JSON file at `path`.
    pub fn with_overrides_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExploreError::Config(format!("{}: {e}", path.display())))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| ExploreError::Config(format!("{}: {e}", path.display())))?;
        self.with_overrides(entries)
    }

    pub fn with_overrides(mut self, entries: HashMap<String, String>) -> Result<Self> {
        for (selector, file) in entries {
            let city: City = selector.parse().map_err(|_| {
                ExploreError::Config(format!("override for unknown city {selector:?}"))
            })?;
            debug!(city = %city, file = %file, "Dataset override");
            self.files.insert(city, PathBuf::from(file));
        }
        Ok(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        match self.files.get(&city) {
            Some(file) => self.data_dir.join(file),
            None => self.data_dir.join(city.default_file()),
        }
    }

    /// Resolves a user-supplied selector to its city and dataset path.
    pub fn resolve(&self, selector: &str) -> Result<(City, PathBuf)> {
        let city: City = selector.parse()?;
        Ok((city, self.path_for(city)))
    }

    /// Loads the dataset for `selector`.
    pub fn load(&self, selector: &str) -> Result<RecordSet> {
        let city: City = selector.parse()?;
        self.load_city(city)
    }

    #[tracing::instrument(skip_all, fields(city = %city))]
    pub fn load_city(&self, city: City) -> Result<RecordSet> {
        let path = self.path_for(city);
        info!(path = %path.display(), "Loading trip data");
        RecordSet::open(&path)
    }

    /// Every city with its resolved dataset path, in a stable order.
    pub fn entries(&self) -> impl Iterator<Item = (City, PathBuf)> + '_ {
        City::ALL.into_iter().map(|city| (city, self.path_for(city)))
    }
}
