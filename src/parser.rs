//! CSV loaders for the scouting and player tables.
//!
//! Either table may be gzip-compressed; a `.gz` suffix selects the decoder.

use flate2::read::GzDecoder;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::PlayerInfo;
use crate::config::MissingFlagPolicy;
use crate::error::{RankingError, Result};
use crate::stats::{PlayBlockRecord, PlayerId};

/// A single row of the scouting table. Only the columns the ranking needs
/// are read; the rest are ignored.
#[derive(Debug, Deserialize)]
struct ScoutingRow {
    #[serde(rename = "nflId")]
    nfl_id: PlayerId,
    #[serde(default)]
    pff_role: String,
    #[serde(rename = "pff_beatenByDefender", default)]
    beaten_by_defender: Option<String>,
    #[serde(rename = "pff_hitAllowed", default)]
    hit_allowed: Option<String>,
    #[serde(rename = "pff_hurryAllowed", default)]
    hurry_allowed: Option<String>,
    #[serde(rename = "pff_sackAllowed", default)]
    sack_allowed: Option<String>,
}

impl ScoutingRow {
    fn into_record(self, policy: MissingFlagPolicy) -> Result<PlayBlockRecord> {
        let id = self.nfl_id;
        Ok(PlayBlockRecord {
            nfl_id: id,
            beaten_by_defender: parse_flag(
                "pff_beatenByDefender",
                self.beaten_by_defender.as_deref(),
                policy,
                id,
            )?,
            hit_allowed: parse_flag("pff_hitAllowed", self.hit_allowed.as_deref(), policy, id)?,
            hurry_allowed: parse_flag("pff_hurryAllowed", self.hurry_allowed.as_deref(), policy, id)?,
            sack_allowed: parse_flag("pff_sackAllowed", self.sack_allowed.as_deref(), policy, id)?,
        })
    }
}

/// Cell contents that mark a value as missing, compared case-insensitively.
const MISSING_MARKERS: [&str; 4] = ["na", "n/a", "nan", "null"];

/// Reads a 0/1 failure flag.
///
/// Accepts `0`, `1`, `0.0`, `1.0`, `true` and `false`. An empty or absent
/// cell, or one holding `NA`, `N/A`, `NaN` or `null`, is resolved by `policy`.
pub fn parse_flag(
    column: &'static str,
    value: Option<&str>,
    policy: MissingFlagPolicy,
    nfl_id: PlayerId,
) -> Result<bool> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !MISSING_MARKERS.iter().any(|m| v.eq_ignore_ascii_case(m)));

    let Some(v) = value else {
        return match policy {
            MissingFlagPolicy::Zero => Ok(false),
            MissingFlagPolicy::Error => Err(RankingError::MissingFlag { nfl_id, column }),
        };
    };

    match v.to_ascii_lowercase().as_str() {
        "0" | "0.0" | "false" => Ok(false),
        "1" | "1.0" | "true" => Ok(true),
        _ => Err(RankingError::InvalidFlag {
            column,
            value: v.to_string(),
        }),
    }
}

/// Reads pass-block records from a scouting table, skipping rows whose
/// `pff_role` is not `role`.
pub fn read_scouting<R: Read>(
    reader: R,
    role: &str,
    policy: MissingFlagPolicy,
) -> Result<Vec<PlayBlockRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize() {
        let row: ScoutingRow = result?;
        if row.pff_role != role {
            skipped += 1;
            continue;
        }
        records.push(row.into_record(policy)?);
    }

    debug!(kept = records.len(), skipped, role, "Scouting rows read");
    Ok(records)
}

/// Reads the player metadata table.
pub fn read_players<R: Read>(reader: R) -> Result<Vec<PlayerInfo>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut players = Vec::new();

    for result in rdr.deserialize() {
        let record: PlayerInfo = result?;
        players.push(record);
    }

    Ok(players)
}

/// Opens a table from disk, transparently decompressing `.gz` files.
pub fn open_table(path: &Path) -> Result<Box<dyn Read>> {
    let file = BufReader::new(File::open(path)?);
    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(GzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

#[tracing::instrument(skip(path, policy), fields(path = %path.display()))]
pub fn load_scouting(path: &Path, role: &str, policy: MissingFlagPolicy) -> Result<Vec<PlayBlockRecord>> {
    let records = read_scouting(open_table(path)?, role, policy)?;
    info!(records = records.len(), "Scouting data loaded");
    Ok(records)
}

#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_players(path: &Path) -> Result<Vec<PlayerInfo>> {
    let players = read_players(open_table(path)?)?;
    info!(players = players.len(), "Player metadata loaded");
    Ok(players)
}
