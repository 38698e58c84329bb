//! Progress reporting for the parallel parse phase

use crate::core::parallel::ProgressUpdate;
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar wrapper; a disabled reporter is a no-op so
/// callers never branch on quiet/CI modes themselves
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner} [{bar:30.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };
        Self { bar }
    }

    /// Apply a progress update from the parse phase
    pub fn update(&self, update: &ProgressUpdate) {
        if let Some(bar) = &self.bar {
            bar.set_length(update.total as u64);
            bar.set_position(update.current as u64);
            bar.set_message(update.message.clone());
        }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
