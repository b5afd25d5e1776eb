//! Settings, layered from defaults, an optional file and `MEMBERQUERY__*`
//! environment variables.
//!
//! ```text
//! database_path = "members.db"        # absent: in memory
//! log_filter = "memberquery=debug"
//!
//! [search]
//! allow_unconstrained = false
//! default_page_size = 20
//! max_page_size = 100
//! ```

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::persist::PersistenceMode;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database_path: Option<PathBuf>,
    pub log_filter: String,
    pub search: SearchSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: None,
            log_filter: "info".to_owned(),
            search: SearchSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// When false, a search without any criteria must go through paging.
    pub allow_unconstrained: bool,
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            allow_unconstrained: true,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl Settings {
    /// A missing file is not an error; a malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix("MEMBERQUERY").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        match &self.database_path {
            Some(path) => PersistenceMode::File(path.clone()),
            None => PersistenceMode::InMemory,
        }
    }
}
