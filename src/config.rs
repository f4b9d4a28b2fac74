use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::SortBy;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV: &str = "CAP_RANKINGS_CONFIG";
/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "cap-rankings.json";

/// Smallest value offered by the "Number of Companies" slider.
pub const MIN_COMPANIES: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Candidate data files, tried in order.
    pub data_paths: Vec<PathBuf>,
    /// Initial number of companies shown.
    pub default_companies: usize,
    /// Initial sort choice, written as its label.
    pub default_sort: SortBy,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_paths: vec![PathBuf::from("final.csv"), PathBuf::from("data/final.csv")],
            default_companies: 25,
            default_sort: SortBy::default(),
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// `$CAP_RANKINGS_CONFIG` if set, else `./cap-rankings.json` if it
    /// exists, else the defaults.
    pub fn discover() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            log::info!("Using config from ${CONFIG_ENV}: {}", Path::new(&path).display());
            return Self::load(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            log::info!("Using config {}", local.display());
            return Self::load(local);
        }
        Ok(Self::default())
    }
}

/// Clamp the "Number of Companies" slider to `[5, total_rows]`.
///
/// Returns `(min, max, value)`. Tables with fewer than five rows use the row
/// count as the lower bound; nothing drops below one.
pub fn companies_slider_bounds(total_rows: usize, wanted: usize) -> (usize, usize, usize) {
    let max = total_rows.max(1);
    let min = MIN_COMPANIES.min(max);
    (min, max, wanted.clamp(min, max))
}
