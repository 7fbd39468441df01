/// Shannon entropy of a discrete distribution given by unnormalised weights
///
/// Non-positive weights are ignored. Returns zero for an empty or all-zero
/// distribution.
pub fn shannon_entropy(weights: impl IntoIterator<Item = f64>) -> f64 {
    let mut total = 0.0;
    let mut weighted_log = 0.0;
    for weight in weights {
        if weight > 0.0 {
            total += weight;
            weighted_log += weight * weight.ln();
        }
    }
    if total <= 0.0 {
        return 0.0;
    }
    // H = ln(W) - sum(w ln w) / W
    total.ln() - weighted_log / total
}
