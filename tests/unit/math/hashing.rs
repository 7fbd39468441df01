//! Tests for retry seed derivation

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use tilecore::math::hashing::{attempt_seed, splitmix64};

    // Tests the first attempt keeps the caller's seed
    // Verified by hashing attempt zero too
    #[test]
    fn test_first_attempt_keeps_seed() {
        assert_eq!(attempt_seed(42, 0), 42);
        assert_eq!(attempt_seed(0, 0), 0);
    }

    // Tests later attempts get distinct seeds
    // Verified by ignoring the attempt number
    #[test]
    fn test_attempt_seeds_are_distinct() {
        let seeds: HashSet<u64> = (0..64).map(|attempt| attempt_seed(42, attempt)).collect();
        assert_eq!(seeds.len(), 64);
        assert_ne!(attempt_seed(1, 1), attempt_seed(2, 1));
    }

    // Tests derivation is a pure function
    // Verified by mixing in a counter
    #[test]
    fn test_attempt_seed_is_stable() {
        assert_eq!(attempt_seed(99, 3), attempt_seed(99, 3));
        assert_eq!(splitmix64(7), splitmix64(7));
        assert_ne!(splitmix64(0), 0);
    }
}
