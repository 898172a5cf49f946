//! Randomized sum-preserving payout partitioning.

use rand::Rng;

use tumbler_core::Coin;

/// Split `total` into at most `count` strictly positive payouts.
///
/// Each of the first `count - 1` slots peels off a uniformly random amount
/// in `[1, remaining/2]` minor units; the last slot absorbs the remainder.
/// The halving bound keeps the remainder shrinking monotonically while the
/// splits come out visibly unequal.
///
/// When the remainder falls to a single minor unit before every slot is
/// filled, that unit is emitted and partitioning stops early: the result
/// may be shorter than `count`, and trailing recipients receive nothing.
/// Invariants that hold regardless: the payouts sum exactly to `total`,
/// and every payout is strictly positive.
///
/// `total` must be at least one minor unit when `count >= 1`.
pub fn partition(total: Coin, count: usize) -> Vec<Coin> {
    partition_with(&mut rand::thread_rng(), total, count)
}

/// [`partition`] with an injected RNG, for deterministic tests.
pub fn partition_with<R: Rng>(rng: &mut R, total: Coin, count: usize) -> Vec<Coin> {
    let mut payouts = Vec::with_capacity(count);
    let mut remaining = total.minor_units();

    for slot in 0..count {
        if slot + 1 == count {
            payouts.push(Coin::from_minor_units(remaining));
            break;
        }

        let upper = remaining / 2;
        if upper == 0 {
            // remaining == 1: emit it and stop; the leftover slots get nothing.
            payouts.push(Coin::from_minor_units(remaining));
            break;
        }

        let payout = rng.gen_range(1..=upper);
        payouts.push(Coin::from_minor_units(payout));
        remaining -= payout;
    }

    payouts
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sum(payouts: &[Coin]) -> Coin {
        payouts.iter().copied().sum()
    }

    #[test]
    fn single_recipient_takes_everything() {
        let total = Coin::from_minor_units(12345);
        assert_eq!(partition(total, 1), vec![total]);
    }

    #[test]
    fn one_minor_unit_across_three_recipients_stops_early() {
        let total = Coin::from_minor_units(1);
        let payouts = partition(total, 3);
        assert_eq!(payouts, vec![total]);
    }

    #[test]
    fn hundred_across_two_sums_and_stays_positive() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let payouts = partition_with(&mut rng, Coin::from_minor_units(100), 2);
            assert_eq!(payouts.len(), 2);
            assert_eq!(sum(&payouts), Coin::from_minor_units(100));
            assert!(payouts.iter().all(Coin::is_positive), "{payouts:?}");
        }
    }

    #[test]
    fn first_slot_never_exceeds_half_the_total() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let payouts = partition_with(&mut rng, Coin::from_minor_units(1000), 4);
            assert!(payouts[0] <= Coin::from_minor_units(500), "{payouts:?}");
        }
    }

    proptest! {
        #[test]
        fn preserves_the_sum_with_positive_parts(
            total in 1i64..1_000_000,
            count in 1usize..20,
            seed in any::<u64>(),
        ) {
            let total = Coin::from_minor_units(total);
            let mut rng = StdRng::seed_from_u64(seed);
            let payouts = partition_with(&mut rng, total, count);

            prop_assert!(!payouts.is_empty());
            prop_assert!(payouts.len() <= count);
            prop_assert_eq!(sum(&payouts), total);
            prop_assert!(payouts.iter().all(Coin::is_positive));
        }
    }
}
