//! Tests for seeded random selection and snapshots

#[cfg(test)]
mod tests {
    use tilecore::algorithm::selection::RandomSelector;

    // Tests identical seeds produce identical sequences
    // Verified by seeding from entropy
    #[test]
    fn test_same_seed_same_choices() {
        let mut a = RandomSelector::new(7);
        let mut b = RandomSelector::new(7);
        let weights = [1.0, 2.0, 3.0, 4.0];
        for _ in 0..50 {
            assert_eq!(a.weighted_choice(&weights), b.weighted_choice(&weights));
        }
    }

    // Tests non-positive weights are never chosen
    // Verified by including zero weights in the cumulative scan
    #[test]
    fn test_weighted_choice_skips_empty_weights() {
        let mut selector = RandomSelector::new(3);
        for _ in 0..200 {
            let choice = selector.weighted_choice(&[0.0, 1.0, -2.0, 1.0]);
            assert!(choice == 1 || choice == 3);
        }
        assert_eq!(selector.weighted_choice(&[0.0, 0.0]), 0);
        assert_eq!(selector.weighted_choice(&[]), 0);
    }

    // Tests weighted choice roughly follows the weights
    // Verified by choosing uniformly
    #[test]
    fn test_weighted_choice_distribution() {
        let mut selector = RandomSelector::new(11);
        let mut counts = [0_usize; 2];
        for _ in 0..4_000 {
            if let Some(count) = counts.get_mut(selector.weighted_choice(&[1.0, 3.0])) {
                *count += 1;
            }
        }
        let heavy_share = counts[1] as f64 / 4_000.0;
        assert!(heavy_share > 0.7 && heavy_share < 0.8, "share was {heavy_share}");
    }

    // Tests restoring a snapshot repeats the draws made after it
    // Verified by restoring a fresh generator instead of the snapshot
    #[test]
    fn test_restore_repeats_sequence() {
        let mut selector = RandomSelector::new(99);
        selector.unit();
        let snapshot = selector.state();
        let first: Vec<f64> = (0..5).map(|_| selector.unit()).collect();

        let mut other = RandomSelector::new(1);
        other.restore(&snapshot);
        let replayed: Vec<f64> = (0..5).map(|_| other.unit()).collect();
        assert_eq!(first, replayed);
        assert!(first.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
