//! Seed derivation for retries

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// One round of the splitmix64 finaliser
pub const fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed for a numbered attempt
///
/// Attempt zero keeps the base seed so a single-attempt run is reproducible
/// from the seed the caller passed.
pub const fn attempt_seed(base: u64, attempt: usize) -> u64 {
    if attempt == 0 {
        return base;
    }
    splitmix64(base ^ splitmix64(attempt as u64))
}
