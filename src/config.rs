//! Configuration for the record mapper

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Options controlling how MARC records are mapped to readable records
#[derive(Debug, Deserialize, Clone)]
pub struct MapperConfig {
    /// Skip records whose 008 control field marks them as a digital or
    /// electronic resource (position 23 is `q` or `s`)
    #[serde(default)]
    pub skip_digital: bool,
}

impl MapperConfig {
    /// Load configuration from files and environment variables
    ///
    /// Reads `config/default` when present, then applies environment
    /// variables with the prefix `MARC_READABLE_` (e.g.
    /// `MARC_READABLE_SKIP_DIGITAL=true`).
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("MARC_READABLE").try_parsing(true))
            .set_default("skip_digital", false)?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            skip_digital: false,
        }
    }
}
