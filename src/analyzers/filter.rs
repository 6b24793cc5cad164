//! Presentation filters over a computed ranking.
//!
//! Each filter is a predicate on [`RankedPlayer`]; a row is shown when every
//! predicate holds. Filtering never re-runs aggregation or smoothing.

use std::collections::{BTreeSet, HashMap};

use crate::analyzers::types::{RankedPlayer, ScatterPoint};

/// Value that stands for "no restriction" in a multi-select.
pub const SELECT_ALL: &str = "Select All";

/// The three filterable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FilterField {
    Position,
    Name,
    College,
}

impl FilterField {
    pub fn value<'a>(&self, player: &'a RankedPlayer) -> &'a str {
        match self {
            FilterField::Position => &player.info.official_position,
            FilterField::Name => &player.info.display_name,
            FilterField::College => &player.info.college_name,
        }
    }
}

/// A multi-select: everything, or only the listed values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// An empty list, or one containing [`SELECT_ALL`], selects everything.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() || values.contains(SELECT_ALL) {
            Selection::All
        } else {
            Selection::Only(values)
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(values) => values.contains(value),
        }
    }
}

/// Predicate keeping players whose `field` is allowed by `selection`.
pub fn field_predicate(field: FilterField, selection: &Selection) -> impl Fn(&RankedPlayer) -> bool + '_ {
    move |player| selection.allows(field.value(player))
}

/// Position, name and college selections, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingFilter {
    pub positions: Selection,
    pub names: Selection,
    pub colleges: Selection,
}

impl RankingFilter {
    pub fn matches(&self, player: &RankedPlayer) -> bool {
        field_predicate(FilterField::Position, &self.positions)(player)
            && field_predicate(FilterField::Name, &self.names)(player)
            && field_predicate(FilterField::College, &self.colleges)(player)
    }

    /// Keeps matching players, preserving ranking order.
    pub fn apply<'a>(&self, players: &'a [RankedPlayer]) -> Vec<&'a RankedPlayer> {
        players.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct values of `field`, most frequent first; ties are alphabetical.
pub fn filter_options(players: &[RankedPlayer], field: FilterField) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for p in players {
        *counts.entry(field.value(p)).or_default() += 1;
    }

    let mut options: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    options.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    options
}

/// Scatter points for players whose raw rate is above `min_raw_rate`.
pub fn scatter_points<'a>(
    players: impl IntoIterator<Item = &'a RankedPlayer>,
    min_raw_rate: f64,
) -> Vec<ScatterPoint> {
    players
        .into_iter()
        .filter(|p| p.raw_rate > min_raw_rate)
        .map(|p| ScatterPoint {
            display_name: p.info.display_name.clone(),
            raw_rate: p.raw_rate,
            smoothed_rate: p.smoothed_rate,
            total_plays: p.stats.total_plays,
        })
        .collect()
}
