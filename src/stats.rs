use serde::Serialize;

pub type PlayerId = u64;

/// One pass-blocking assignment of one player on one play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayBlockRecord {
    pub nfl_id: PlayerId,
    pub beaten_by_defender: bool,
    pub hit_allowed: bool,
    pub hurry_allowed: bool,
    pub sack_allowed: bool,
}

impl PlayBlockRecord {
    /// A block is successful when none of the four failure flags tripped.
    pub fn is_successful(&self) -> bool {
        !(self.beaten_by_defender || self.hit_allowed || self.hurry_allowed || self.sack_allowed)
    }
}

/// Per-player block counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerAggregate {
    pub total_plays: u32,
    pub successful_blocks: u32,

    // failure counts, display only
    pub beaten_by_defender: u32,
    pub hits_allowed: u32,
    pub hurries_allowed: u32,
    pub sacks_allowed: u32,
}

impl PlayerAggregate {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PlayBlockRecord>) -> Self {
        let mut s = PlayerAggregate::default();
        for r in records {
            s.record(r);
        }
        s
    }

    pub fn record(&mut self, r: &PlayBlockRecord) {
        self.total_plays += 1;

        if r.is_successful() {
            self.successful_blocks += 1;
        }

        if r.beaten_by_defender {
            self.beaten_by_defender += 1;
        }

        if r.hit_allowed {
            self.hits_allowed += 1;
        }

        if r.hurry_allowed {
            self.hurries_allowed += 1;
        }

        if r.sack_allowed {
            self.sacks_allowed += 1;
        }
    }

    /// Observed success proportion; 0.0 for a player with no plays.
    pub fn raw_rate(&self) -> f64 {
        if self.total_plays == 0 {
            0.0
        } else {
            self.successful_blocks as f64 / self.total_plays as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(beaten: bool, hit: bool, hurry: bool, sack: bool) -> PlayBlockRecord {
        PlayBlockRecord {
            nfl_id: 1,
            beaten_by_defender: beaten,
            hit_allowed: hit,
            hurry_allowed: hurry,
            sack_allowed: sack,
        }
    }

    #[test]
    fn test_clean_play_is_successful() {
        assert!(play(false, false, false, false).is_successful());
    }

    #[test]
    fn test_any_flag_fails_the_block() {
        assert!(!play(true, false, false, false).is_successful());
        assert!(!play(false, true, false, false).is_successful());
        assert!(!play(false, false, true, false).is_successful());
        assert!(!play(false, false, false, true).is_successful());
    }

    #[test]
    fn test_from_records_counts() {
        let records = vec![
            play(false, false, false, false),
            play(false, false, false, false),
            play(true, false, true, false),
            play(true, true, false, true),
        ];
        let stats = PlayerAggregate::from_records(&records);

        assert_eq!(stats.total_plays, 4);
        assert_eq!(stats.successful_blocks, 2);
        assert_eq!(stats.beaten_by_defender, 2);
        assert_eq!(stats.hits_allowed, 1);
        assert_eq!(stats.hurries_allowed, 1);
        assert_eq!(stats.sacks_allowed, 1);
        assert_eq!(stats.raw_rate(), 0.5);
    }

    #[test]
    fn test_raw_rate_with_zero_plays() {
        assert_eq!(PlayerAggregate::default().raw_rate(), 0.0);
    }
}
