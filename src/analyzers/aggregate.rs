use crate::analyzers::types::{JoinedPlayer, PlayerInfo};
use crate::stats::{PlayBlockRecord, PlayerAggregate, PlayerId};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, warn};

/// Players that survived the metadata join and the position filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub players: BTreeMap<PlayerId, JoinedPlayer>,
    /// Scouting ids with no metadata row, ascending.
    pub dropped_player_ids: Vec<PlayerId>,
}

/// Reduces play records into one [`PlayerAggregate`] per player.
pub fn aggregate_records(records: &[PlayBlockRecord]) -> BTreeMap<PlayerId, PlayerAggregate> {
    let mut by_player: BTreeMap<PlayerId, PlayerAggregate> = BTreeMap::new();

    for r in records {
        by_player.entry(r.nfl_id).or_default().record(r);
    }

    by_player
}

/// Joins aggregates with player metadata and keeps the players whose
/// official position is in `positions`.
///
/// Players without metadata are dropped with a warning rather than failing
/// the run. If a player has more than one metadata row the first one wins.
pub fn join_players(
    aggregates: BTreeMap<PlayerId, PlayerAggregate>,
    players: &[PlayerInfo],
    positions: &BTreeSet<String>,
) -> Aggregation {
    let mut info_by_id: HashMap<PlayerId, &PlayerInfo> = HashMap::with_capacity(players.len());
    for p in players {
        match info_by_id.entry(p.nfl_id) {
            Entry::Vacant(slot) => {
                slot.insert(p);
            }
            Entry::Occupied(_) => {
                warn!(nfl_id = p.nfl_id, "Duplicate player metadata row, keeping the first");
            }
        }
    }

    let mut out = Aggregation::default();
    let mut excluded = 0usize;

    for (nfl_id, stats) in aggregates {
        let Some(info) = info_by_id.get(&nfl_id) else {
            out.dropped_player_ids.push(nfl_id);
            continue;
        };

        if !positions.contains(&info.official_position) {
            excluded += 1;
            continue;
        }

        out.players.insert(
            nfl_id,
            JoinedPlayer {
                info: (*info).clone(),
                stats,
            },
        );
    }

    if !out.dropped_player_ids.is_empty() {
        warn!(
            count = out.dropped_player_ids.len(),
            "Players without metadata dropped"
        );
        debug!(ids = ?out.dropped_player_ids, "Dropped player ids");
    }
    debug!(
        kept = out.players.len(),
        excluded_by_position = excluded,
        "Player join complete"
    );

    out
}

/// Aggregates play records per player, joins metadata, and applies the
/// position filter. Excluded players never reach the prior fit.
#[tracing::instrument(skip_all, fields(records = records.len(), players = players.len()))]
pub fn aggregate(
    records: &[PlayBlockRecord],
    players: &[PlayerInfo],
    positions: &BTreeSet<String>,
) -> Aggregation {
    join_players(aggregate_records(records), players, positions)
}
