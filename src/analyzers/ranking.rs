use crate::analyzers::aggregate::{Aggregation, aggregate};
use crate::analyzers::prior::{BetaPrior, apply_smoothing, fit_prior};
use crate::analyzers::types::{PlayerInfo, RankedPlayer, RankingTable};
use crate::config::RankingConfig;
use crate::error::{RankingError, Result};
use crate::parser::{load_players, load_scouting};
use crate::stats::PlayBlockRecord;
use std::path::Path;
use tracing::info;

/// Attaches raw and smoothed rates to every player and orders them best
/// first. Ties on the smoothed rate fall back to ascending player id.
pub fn rank(aggregation: &Aggregation, prior: &BetaPrior) -> Vec<RankedPlayer> {
    let mut ranked: Vec<RankedPlayer> = aggregation
        .players
        .values()
        .map(|p| RankedPlayer {
            info: p.info.clone(),
            stats: p.stats,
            raw_rate: p.stats.raw_rate(),
            smoothed_rate: apply_smoothing(&p.stats, prior),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.smoothed_rate
            .total_cmp(&a.smoothed_rate)
            .then(a.info.nfl_id.cmp(&b.info.nfl_id))
    });

    ranked
}

/// Runs aggregate, fit and apply over already-loaded inputs.
///
/// # Errors
///
/// [`RankingError::EmptyInput`] when either table is empty or no player
/// survives the join, and [`RankingError::DegeneratePriorFit`] when the prior
/// cannot be fit.
#[tracing::instrument(skip_all, fields(records = records.len(), players = players.len()))]
pub fn rank_players(
    records: &[PlayBlockRecord],
    players: &[PlayerInfo],
    config: &RankingConfig,
) -> Result<RankingTable> {
    if records.is_empty() {
        return Err(RankingError::empty("no pass-block scouting records"));
    }
    if players.is_empty() {
        return Err(RankingError::empty("no player metadata rows"));
    }

    let aggregation = aggregate(records, players, &config.positions);
    if aggregation.players.is_empty() {
        return Err(RankingError::empty(
            "no players left after metadata join and position filter",
        ));
    }

    let prior = fit_prior(aggregation.players.values().map(|p| &p.stats), config.min_plays)?;
    let qualifying_players = aggregation
        .players
        .values()
        .filter(|p| p.stats.total_plays >= config.min_plays)
        .count();

    let ranked = rank(&aggregation, &prior);
    info!(ranked = ranked.len(), "Ranking computed");

    Ok(RankingTable {
        prior,
        min_plays: config.min_plays,
        qualifying_players,
        dropped_player_ids: aggregation.dropped_player_ids,
        players: ranked,
    })
}

/// Loads both tables from disk and ranks them.
pub fn rank_files(scouting: &Path, players: &Path, config: &RankingConfig) -> Result<RankingTable> {
    let records = load_scouting(scouting, &config.pass_block_role, config.missing_flags)?;
    let players = load_players(players)?;

    rank_players(&records, &players, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PlayerId;

    fn plays(nfl_id: PlayerId, total: u32, successes: u32) -> Vec<PlayBlockRecord> {
        (0..total)
            .map(|i| PlayBlockRecord {
                nfl_id,
                beaten_by_defender: i >= successes,
                hit_allowed: false,
                hurry_allowed: false,
                sack_allowed: false,
            })
            .collect()
    }

    fn info(nfl_id: PlayerId, name: &str, position: &str) -> PlayerInfo {
        PlayerInfo {
            nfl_id,
            display_name: name.to_string(),
            official_position: position.to_string(),
            ..Default::default()
        }
    }

    fn scenario() -> (Vec<PlayBlockRecord>, Vec<PlayerInfo>) {
        let mut records = plays(1, 150, 140);
        records.extend(plays(2, 150, 100));
        records.extend(plays(3, 1, 1));
        let players = vec![info(1, "A", "T"), info(2, "B", "G"), info(3, "C", "C")];
        (records, players)
    }

    #[test]
    fn test_rank_players_scenario() {
        let (records, players) = scenario();
        let table = rank_players(&records, &players, &RankingConfig::default()).unwrap();

        assert_eq!(table.qualifying_players, 2);
        assert!((table.prior.mean() - 0.8).abs() < 1e-9);

        let names: Vec<_> = table.players.iter().map(|p| p.info.display_name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "B"]);

        let a = &table.players[0];
        let c = &table.players[1];
        let b = &table.players[2];
        assert_eq!(c.raw_rate, 1.0);
        assert!(c.smoothed_rate > table.prior.mean() && c.smoothed_rate < c.raw_rate);
        assert!((c.raw_rate - c.smoothed_rate) > (a.raw_rate - a.smoothed_rate).abs());
        assert!((c.raw_rate - c.smoothed_rate) > (b.raw_rate - b.smoothed_rate).abs());
    }

    #[test]
    fn test_rank_sorted_descending() {
        let (records, players) = scenario();
        let table = rank_players(&records, &players, &RankingConfig::default()).unwrap();

        for pair in table.players.windows(2) {
            assert!(pair[0].smoothed_rate >= pair[1].smoothed_rate);
        }
    }

    #[test]
    fn test_rank_players_is_deterministic() {
        let (records, players) = scenario();
        let config = RankingConfig::default();

        let first = rank_players(&records, &players, &config).unwrap();
        let second = rank_players(&records, &players, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_player_without_metadata_is_dropped() {
        let (mut records, players) = scenario();
        records.extend(plays(42, 10, 10));

        let table = rank_players(&records, &players, &RankingConfig::default()).unwrap();

        assert!(table.players.iter().all(|p| p.info.nfl_id != 42));
        assert_eq!(table.dropped_player_ids, vec![42]);
    }

    #[test]
    fn test_excluded_position_does_not_move_prior() {
        let (mut records, mut players) = scenario();
        let baseline = rank_players(&records, &players, &RankingConfig::default()).unwrap();

        records.extend(plays(9, 300, 30));
        players.push(info(9, "QB", "QB"));
        let table = rank_players(&records, &players, &RankingConfig::default()).unwrap();

        assert_eq!(table.prior, baseline.prior);
        assert_eq!(table.players.len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        let (records, players) = scenario();
        let config = RankingConfig::default();

        assert!(matches!(
            rank_players(&[], &players, &config),
            Err(RankingError::EmptyInput { .. })
        ));
        assert!(matches!(
            rank_players(&records, &[], &config),
            Err(RankingError::EmptyInput { .. })
        ));
        assert!(matches!(
            rank_players(&records, &[info(1, "A", "QB")], &config),
            Err(RankingError::EmptyInput { .. })
        ));
    }

    #[test]
    fn test_identical_rates_fail_fast() {
        let mut records = plays(1, 100, 80);
        records.extend(plays(2, 200, 160));
        let players = vec![info(1, "A", "G"), info(2, "B", "G")];

        let result = rank_players(&records, &players, &RankingConfig::default());
        assert!(matches!(result, Err(RankingError::DegeneratePriorFit { .. })));
    }
}
