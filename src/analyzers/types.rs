//! Data types used by the ranking pipeline.

use serde::{Deserialize, Serialize};

use crate::analyzers::prior::BetaPrior;
use crate::stats::{PlayerAggregate, PlayerId};

/// A single row of the player metadata table.
///
/// Everything except `official_position` is carried through to the output
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct PlayerInfo {
    pub nfl_id: PlayerId,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub official_position: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub birth_date: String,
}

/// A player's block counts joined with their metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedPlayer {
    pub info: PlayerInfo,
    pub stats: PlayerAggregate,
}

/// Final per-player row: counts, metadata, raw and smoothed success rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub info: PlayerInfo,
    #[serde(flatten)]
    pub stats: PlayerAggregate,
    pub raw_rate: f64,
    pub smoothed_rate: f64,
}

/// The complete output of one pipeline run, ordered best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingTable {
    pub prior: BetaPrior,
    pub min_plays: u32,
    /// Players that met `min_plays` and took part in the prior fit.
    pub qualifying_players: usize,
    /// Scouting ids with no metadata row.
    pub dropped_player_ids: Vec<PlayerId>,
    pub players: Vec<RankedPlayer>,
}

/// One point of the raw vs. smoothed scatter plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub display_name: String,
    pub raw_rate: f64,
    pub smoothed_rate: f64,
    pub total_plays: u32,
}
