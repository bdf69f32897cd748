//! Configuration file
//!
//! A single JSON object; every field is optional. No file means defaults.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::explain::{ExplainOptions, IndexNamePolicy};
use crate::observability::Severity;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Spelling of index name suffixes (default "plain")
    #[serde(default)]
    pub index_name_policy: IndexNamePolicy,

    /// Minimum logged severity (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Run path correlation (default true)
    #[serde(default = "default_correlate")]
    pub correlate: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_correlate() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_name_policy: IndexNamePolicy::default(),
            log_level: default_log_level(),
            correlate: default_correlate(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate field values serde cannot check
    pub fn validate(&self) -> CliResult<()> {
        self.log_severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> CliResult<Severity> {
        Severity::from_str(&self.log_level).map_err(|e| {
            CliError::config_error(format!("Invalid log_level: {}", e))
        })
    }

    /// Pipeline options this configuration selects
    pub fn explain_options(&self) -> ExplainOptions {
        ExplainOptions {
            index_name_policy: self.index_name_policy,
            correlate: self.correlate,
        }
    }
}
