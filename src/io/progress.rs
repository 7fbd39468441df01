//! Terminal progress bar fed by the generation progress callback

use crate::algorithm::control::ProgressCallback;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;

// Fractions are reported in [0, 1]; the bar counts in thousandths
const BAR_RESOLUTION: u64 = 1_000;

/// Single progress bar for one generation request
///
/// The callback handed to the pipeline only moves the bar; drawing is
/// rate-limited by indicatif and never blocks the stepping loop.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Create a hidden-until-used progress bar
    pub fn new() -> Self {
        let template = format!(
            "{{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{percent:>3}}% {{elapsed}}"
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏ ");
        let bar = ProgressBar::new(BAR_RESOLUTION);
        bar.set_style(style);
        Self { bar }
    }

    /// Callback to store in the generation options
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Arc::new(move |label: &str, fraction: f64| {
            bar.set_message(label.to_string());
            bar.set_position((fraction.clamp(0.0, 1.0) * BAR_RESOLUTION as f64) as u64);
        })
    }

    /// Current position in thousandths
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Finish and clear the bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
