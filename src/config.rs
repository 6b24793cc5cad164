//! Ranking configuration.
//!
//! Stored as a plain JSON object on disk; every key is optional:
//! ```json
//! {
//!   "min_plays": 100,
//!   "positions": ["G", "TE", "C", "T"],
//!   "pass_block_role": "Pass Block",
//!   "missing_flags": "zero",
//!   "scatter_min_raw_rate": 0.6
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Minimum number of plays for a player to take part in the prior fit.
pub const DEFAULT_MIN_PLAYS: u32 = 100;

/// Guard, Tight End, Center, Tackle.
pub const DEFAULT_POSITIONS: [&str; 4] = ["G", "TE", "C", "T"];

pub const DEFAULT_PASS_BLOCK_ROLE: &str = "Pass Block";

pub const DEFAULT_SCATTER_MIN_RAW_RATE: f64 = 0.6;

/// How an empty failure-flag cell in the scouting table is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MissingFlagPolicy {
    /// The flag was not tripped.
    #[default]
    Zero,
    /// Reject the input.
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub min_plays: u32,
    pub positions: BTreeSet<String>,
    pub pass_block_role: String,
    pub missing_flags: MissingFlagPolicy,
    pub scatter_min_raw_rate: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_plays: DEFAULT_MIN_PLAYS,
            positions: DEFAULT_POSITIONS.iter().map(|p| p.to_string()).collect(),
            pass_block_role: DEFAULT_PASS_BLOCK_ROLE.to_string(),
            missing_flags: MissingFlagPolicy::default(),
            scatter_min_raw_rate: DEFAULT_SCATTER_MIN_RAW_RATE,
        }
    }
}

impl RankingConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        Self::from_json(&content).with_context(|| format!("parsing config file {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
