//! Configure the CSS minifier.
//!
//! Options are given either as a legacy boolean or as a [`Settings`] object,
//! and are normalized per file into a [`Config`].

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::{util::data, File};

/// Options accepted by [`csso()`](crate::csso).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Options {
    /// Legacy shorthand.
    ///
    /// `false` enables restructuring, `true` disables it.
    Legacy(bool),

    /// Configuration object.
    Settings(Settings),
}

/// Configuration object for [`Options`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Merge and reorder rules.
    pub restructure: bool,

    /// Generate a source map.
    ///
    /// Defaults to `false`, even when the file already carries a source map.
    /// In that case the existing map is removed.
    pub source_map: bool,

    /// Ignored: always replaced by the path of the processed file.
    pub filename: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            restructure: true,
            source_map: false,
            filename: None,
        }
    }
}

/// Normalized configuration for one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Merge and reorder rules.
    pub restructure: bool,

    /// Generate a source map.
    pub source_map: bool,

    /// Name of the processed file, as it appears in source maps.
    pub filename: String,
}

impl Default for Options {
    fn default() -> Self {
        Self::Settings(Settings::default())
    }
}

impl From<bool> for Options {
    fn from(value: bool) -> Self {
        Self::Legacy(value)
    }
}

impl From<Settings> for Options {
    fn from(value: Settings) -> Self {
        Self::Settings(value)
    }
}

impl From<Option<Options>> for Options {
    fn from(value: Option<Options>) -> Self {
        value.unwrap_or_default()
    }
}

impl Options {
    /// Normalize options for `file`.
    ///
    /// The `filename` setting is replaced by the path of `file` relative to
    /// its base.
    pub fn resolve(&self, file: &File) -> Config {
        let filename = file.relative().to_string_lossy().into_owned();

        match self {
            Self::Legacy(legacy) => Config {
                restructure: !legacy,
                source_map: false,
                filename,
            },
            Self::Settings(settings) => Config {
                restructure: settings.restructure,
                source_map: settings.source_map,
                filename,
            },
        }
    }

    /// Load options from a JSON string.
    pub fn from_json_str(content: impl AsRef<str>) -> Result<Self> {
        data::json::read_str(content)
    }

    /// Load options from a TOML string.
    ///
    /// TOML documents are tables, so only the object form is accepted.
    pub fn from_toml_str(content: impl AsRef<str>) -> Result<Self> {
        let settings: Settings = data::toml::read_str(content)?;
        Ok(Self::Settings(settings))
    }

    /// Load options from a `.json` or `.toml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => data::json::read_file(path),
            Some("toml") => {
                let settings: Settings = data::toml::read_file(path)?;
                Ok(Self::Settings(settings))
            },
            _ => Err(anyhow!("unsupported configuration file {:?}", path)),
        }
    }
}
