use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::DEFAULT_TOP_N;

/// Looked up in the working directory when no explicit path is given.
pub const CONFIG_FILE: &str = "ride_dashboard.json";

/// Dataset read on start-up when nothing else is configured.
pub const DEFAULT_DATA_FILE: &str = "OLA_Ride_Cleaned_file.csv";

/// Start-up settings. Every field is optional in the JSON file.
///
/// ```json
/// { "data_path": "rides.parquet", "top_n": 5, "window_title": "Rides" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub top_n: usize,
    pub window_title: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            top_n: DEFAULT_TOP_N,
            window_title: "Ride Analytics Dashboard".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        anyhow::ensure!(config.top_n > 0, "top_n must be at least 1");
        Ok(config)
    }

    /// `ride_dashboard.json` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            log::info!("Using config {}", path.display());
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace the data path when one was given on the command line.
    pub fn with_data_path(mut self, data_path: Option<PathBuf>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        self
    }
}
