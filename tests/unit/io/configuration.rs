//! Tests for generation constants

#[cfg(test)]
mod tests {
    use tilecore::io::configuration::{
        CELL_PIXELS, DEFAULT_DEPTH, DEFAULT_RETRIES, DEFAULT_SEED, DEFAULT_STEP_LIMIT,
        MAX_GRID_DIMENSION, OUTPUT_SUFFIX, PROGRESS_BAR_WIDTH, PROGRESS_INTERVAL_MS,
        PROGRESS_LABEL,
    };

    // Tests default seed is fixed
    // Verified by changing seed value
    #[test]
    fn test_default_seed_is_reproducible() {
        assert_eq!(DEFAULT_SEED, 42);
    }

    // Tests defaults leave the solve unbounded with a few retries
    // Verified by changing the step limit default
    #[test]
    fn test_generation_defaults() {
        assert_eq!(DEFAULT_STEP_LIMIT, 0);
        assert_eq!(DEFAULT_RETRIES, 3);
        assert_eq!(DEFAULT_DEPTH, 1);
    }

    // Tests progress rate limit and label
    // Verified by changing the interval
    #[test]
    fn test_progress_settings() {
        assert_eq!(PROGRESS_INTERVAL_MS, 100);
        assert_eq!(PROGRESS_LABEL, "Generating");
        assert_eq!(PROGRESS_BAR_WIDTH, 50);
    }

    // Tests maximum grid dimension value
    // Verified by reducing dimension limit
    #[test]
    fn test_max_grid_dimension() {
        assert_eq!(MAX_GRID_DIMENSION, 4_096);
        assert!(CELL_PIXELS > 0);
    }

    // Tests filesystem safety of suffix
    // Verified by adding special character
    #[test]
    fn test_output_suffix_no_special_chars() {
        assert!(OUTPUT_SUFFIX.starts_with('_'));
        for ch in OUTPUT_SUFFIX.chars() {
            assert!(
                ch.is_alphanumeric() || ch == '_' || ch == '-',
                "Output suffix contains invalid character: {ch}"
            );
        }
    }
}
