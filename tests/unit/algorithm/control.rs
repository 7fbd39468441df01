//! Tests for cancellation tokens and progress throttling

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tilecore::algorithm::control::{CancellationToken, ProgressCallback, ProgressThrottle};

    fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<(String, f64)>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let callback: ProgressCallback = Arc::new(move |label: &str, fraction: f64| {
            sink.lock().expect("lock").push((label.to_string(), fraction));
        });
        (callback, calls)
    }

    // Tests clones of a token share one flag
    // Verified by deriving a fresh flag in Clone
    #[test]
    fn test_cancellation_is_shared() {
        let token = CancellationToken::new();
        let handle = token.clone();
        assert!(!handle.is_cancelled());
        token.cancel();
        assert!(handle.is_cancelled());
    }

    // Tests reports inside the interval are dropped
    // Verified by never recording the last report time
    #[test]
    fn test_throttle_limits_rate() {
        let (callback, calls) = recorder();
        let mut throttle = ProgressThrottle::new(Some(callback), Duration::from_secs(3_600));
        throttle.report("Generating", || 0.1);
        throttle.report("Generating", || 0.2);
        throttle.report("Generating", || 0.3);
        assert_eq!(calls.lock().expect("lock").len(), 1);

        throttle.finish("Generating", 1.0);
        let calls = calls.lock().expect("lock");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls.last(), Some(&("Generating".to_string(), 1.0)));
    }

    // Tests the fraction is only computed when a report goes out
    // Verified by evaluating the closure before the rate check
    #[test]
    fn test_throttle_is_lazy() {
        let (callback, _calls) = recorder();
        let mut throttle = ProgressThrottle::new(Some(callback), Duration::from_secs(3_600));
        let mut evaluated = 0;
        for _ in 0..10 {
            throttle.report("Generating", || {
                evaluated += 1;
                0.5
            });
        }
        assert_eq!(evaluated, 1);
    }

    // Tests a throttle without callback does nothing
    // Verified by evaluating the fraction unconditionally
    #[test]
    fn test_throttle_without_callback() {
        let mut throttle = ProgressThrottle::new(None, Duration::ZERO);
        let mut evaluated = false;
        throttle.report("Generating", || {
            evaluated = true;
            0.0
        });
        throttle.finish("Generating", 1.0);
        assert!(!evaluated);
        assert!(format!("{throttle:?}").contains("enabled: false"));
    }
}
