use oline_rater::analyzers::aggregate::aggregate_records;
use oline_rater::analyzers::prior::{BetaPrior, apply_smoothing};
use oline_rater::stats::{PlayBlockRecord, PlayerAggregate};
use proptest::prelude::*;

fn record() -> impl Strategy<Value = PlayBlockRecord> {
    (0u64..8, any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(nfl_id, beaten_by_defender, hit_allowed, hurry_allowed, sack_allowed)| PlayBlockRecord {
            nfl_id,
            beaten_by_defender,
            hit_allowed,
            hurry_allowed,
            sack_allowed,
        },
    )
}

fn prior() -> impl Strategy<Value = BetaPrior> {
    (0.1f64..50.0, 0.1f64..50.0).prop_map(|(a, b)| BetaPrior::new(a, b).unwrap())
}

proptest! {
    #[test]
    fn successes_never_exceed_plays(records in prop::collection::vec(record(), 0..200)) {
        let by_player = aggregate_records(&records);

        let total: u32 = by_player.values().map(|a| a.total_plays).sum();
        prop_assert_eq!(total as usize, records.len());

        for a in by_player.values() {
            prop_assert!(a.successful_blocks <= a.total_plays);
            prop_assert!(a.total_plays > 0);
        }
    }

    #[test]
    fn smoothed_rate_lies_between_prior_mean_and_raw_rate(
        prior in prior(),
        total_plays in 1u32..5000,
        success_share in 0.0f64..=1.0,
    ) {
        let successful_blocks = (total_plays as f64 * success_share).round() as u32;
        let a = PlayerAggregate { total_plays, successful_blocks, ..Default::default() };

        let smoothed = apply_smoothing(&a, &prior);
        let lo = prior.mean().min(a.raw_rate());
        let hi = prior.mean().max(a.raw_rate());
        prop_assert!(smoothed >= lo - 1e-12 && smoothed <= hi + 1e-12);
    }

    #[test]
    fn more_plays_at_same_rate_moves_toward_raw_rate(
        prior in prior(),
        plays in 1u32..500,
        successes_per_ten in 0u32..=10,
    ) {
        let small = PlayerAggregate {
            total_plays: plays * 10,
            successful_blocks: plays * successes_per_ten,
            ..Default::default()
        };
        let large = PlayerAggregate {
            total_plays: plays * 100,
            successful_blocks: plays * successes_per_ten * 10,
            ..Default::default()
        };

        let raw = small.raw_rate();
        let small_gap = (apply_smoothing(&small, &prior) - raw).abs();
        let large_gap = (apply_smoothing(&large, &prior) - raw).abs();
        prop_assert!(large_gap <= small_gap + 1e-12);
    }

    #[test]
    fn zero_plays_is_prior_mean(prior in prior()) {
        let smoothed = apply_smoothing(&PlayerAggregate::default(), &prior);
        prop_assert_eq!(smoothed, prior.alpha0 / (prior.alpha0 + prior.beta0));
    }
}
