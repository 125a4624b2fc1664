//! Application configuration management.
//!
//! Configuration is layered from default values, an optional TOML file and
//! environment variables, in increasing order of precedence.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tem_consensus::OfferSchedule;

/// The configuration of the command-line tool
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// The offers cleared by the `sweep` subcommand
    #[serde(default)]
    pub schedule: OfferSchedule,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `TEM_<SECTION>__<KEY>` to `<section>.<key>`, e.g.
    ///
    /// ```bash
    /// export TEM_SCHEDULE__KIND=diurnal
    /// export TEM_SCHEDULE__MEAN=900
    /// export TEM_SCHEDULE__AMPLITUDE=300
    /// export TEM_SCHEDULE__SAMPLES=97
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        config = config.add_source(
            config::Environment::with_prefix("TEM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
