//! Run configuration: roster, repositories root, grid, horizon

use std::path::PathBuf;

use serde::Deserialize;

use crate::date::Date;
use crate::error::{Error, Result};
use crate::grid::CheckpointGrid;

/// Everything a mining run needs, constructed once by the caller and
/// handed to the orchestrator. Nothing here is ambient process state.
#[derive(Debug, Clone)]
pub struct MiningConfig {
    /// Directory containing one working-directory checkout per roster entry
    pub repos_root: PathBuf,
    /// Ordered repository roster; defines report row order
    pub roster: Vec<String>,
    /// The checkpoint calendar
    pub grid: CheckpointGrid,
    /// Oldest date the history walk is willing to reach
    pub horizon: Date,
}

/// Conventional run window: 31 monthly checkpoints anchored at
/// April 2020, with the history horizon at the start of that year.
impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            repos_root: PathBuf::from("repos"),
            roster: Vec::new(),
            grid: CheckpointGrid::monthly(2020, 4, 31),
            horizon: Date::at_midnight(2020, 1, 1),
        }
    }
}

/// On-disk YAML shape of a run configuration.
#[derive(Debug, Deserialize)]
struct RawConfig {
    repos_root: PathBuf,
    repositories: Vec<String>,
    #[serde(default = "default_anchor_year")]
    anchor_year: i32,
    #[serde(default = "default_anchor_month")]
    anchor_month: u32,
    #[serde(default = "default_checkpoints")]
    checkpoints: usize,
    #[serde(default = "default_horizon")]
    horizon: String,
}

fn default_anchor_year() -> i32 {
    2020
}

fn default_anchor_month() -> u32 {
    4
}

fn default_checkpoints() -> usize {
    31
}

fn default_horizon() -> String {
    "2020-01-01".to_string()
}

impl MiningConfig {
    /// Load a run configuration from YAML.
    ///
    /// Empty roster entries are dropped (YAML lists pasted from env vars
    /// tend to carry them); an entirely empty roster is a config error.
    pub fn from_yaml(input: &str) -> Result<Self> {
        let raw: RawConfig = serde_yaml::from_str(input)?;
        let roster: Vec<String> = raw
            .repositories
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .collect();
        if roster.is_empty() {
            return Err(Error::Config("empty repository roster".to_string()));
        }
        if raw.anchor_month == 0 || raw.anchor_month > 12 {
            return Err(Error::Config(format!(
                "anchor_month {} out of range 1-12",
                raw.anchor_month
            )));
        }
        Ok(Self {
            repos_root: raw.repos_root,
            roster,
            grid: CheckpointGrid::monthly(raw.anchor_year, raw.anchor_month, raw.checkpoints),
            horizon: Date::parse(&raw.horizon)?,
        })
    }
}
