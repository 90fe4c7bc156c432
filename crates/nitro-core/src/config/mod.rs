//! Project-level settings
//!
//! Settings are read from an optional YAML file in the working directory
//! (named by `ProductConfig::settings_file`). Every field has a default, so a
//! missing file or a partial file are both valid.

use crate::product::ProductConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the latest published version is looked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionSource {
    /// `npm view <package> version`
    #[default]
    Npm,
    /// `GET <registry_url>/<package>/latest`
    Registry,
}

/// Self-update behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    /// Check for a newer published version on start
    pub enabled: bool,

    pub source: VersionSource,

    /// Registry base URL for the `registry` source
    pub registry_url: Option<String>,

    /// Upper bound for each query and the install, in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            source: VersionSource::Npm,
            registry_url: None,
            timeout_secs: None,
        }
    }
}

impl UpdateSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Base folders for generated component files, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Parent folder of `DatoBlock<Name>/` folders
    pub blocks: PathBuf,

    /// Parent folder of UI component folders
    pub ui: PathBuf,

    /// Folder holding GraphQL fragments
    pub fragments: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            blocks: PathBuf::from("src/components/blocks"),
            ui: PathBuf::from("src/components/ui"),
            fragments: PathBuf::from("src/graphql/dato/operations/queries/fragments"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub update: UpdateSettings,
    pub paths: PathSettings,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub source_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from `dir`, falling back to defaults when no file exists
    pub fn load<C: ProductConfig>(config: &C, dir: &Path) -> Result<Self> {
        let path = dir.join(config.settings_file());
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut settings = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        settings.source_file = Some(path);

        Ok(settings)
    }

    /// Parse settings from YAML; an empty document yields defaults
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Registry URL: environment override, then settings file, then product default
    pub fn registry_url<C: ProductConfig>(&self, config: &C) -> String {
        self.resolve_registry_url(config, std::env::var(config.registry_url_env()).ok())
    }

    fn resolve_registry_url<C: ProductConfig>(&self, config: &C, env_value: Option<String>) -> String {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.update.registry_url.clone())
            .unwrap_or_else(|| config.default_registry_url().to_string())
    }

    /// Whether any output folder differs from the defaults
    pub fn has_custom_paths(&self) -> bool {
        self.paths != PathSettings::default()
    }
}
