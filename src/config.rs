use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::LoaderOptions;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "QA_EXPLORER_CONFIG";
/// Config file picked up from the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "qa-explorer.json";
/// Question file read at startup unless configured otherwise.
pub const DEFAULT_SOURCE: &str = "index.csv";

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// How the category filter is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryWidget {
    /// Checkbox per category.
    #[default]
    Multi,
    /// One category (or all) from a drop-down.
    Single,
}

/// How matching records are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultLayout {
    #[default]
    Cards,
    Table,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Question file, relative to the working directory.
    pub source_path: PathBuf,
    pub loader: LoaderOptions,
    pub sort_by_ordinal: bool,
    pub category_widget: CategoryWidget,
    pub layout: ResultLayout,
    pub show_chart: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from(DEFAULT_SOURCE),
            loader: LoaderOptions::default(),
            sort_by_ordinal: true,
            category_widget: CategoryWidget::default(),
            layout: ResultLayout::default(),
            show_chart: false,
        }
    }
}

impl AppConfig {
    /// Resolve the startup configuration.
    ///
    /// `$QA_EXPLORER_CONFIG` wins, then `./qa-explorer.json`, then defaults.
    /// A config that cannot be read or parsed is logged and ignored.
    pub fn load() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !local.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE}, using defaults");
                    return Self::default();
                }
                local
            }
        };

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Using config {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid config JSON")
    }
}
