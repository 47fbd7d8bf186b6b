//! Optional TOML settings file.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use labyrinth_system_navigation::NavigationConfig;
use serde::Deserialize;

/// Log filter used when neither `RUST_LOG` nor the settings provide one.
pub(crate) const DEFAULT_LOG_FILTER: &str = "warn";

/// Contents of the settings file. Every table and key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) navigation: NavigationConfig,
    pub(crate) logging: LoggingSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct LoggingSettings {
    pub(crate) filter: Option<String>,
}

impl Settings {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings in {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub(crate) fn log_filter(&self) -> &str {
        self.logging.filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
