//! Spinners for network waits in the CLI.
//!
//! Progress output goes to stderr and is hidden when:
//! - `--no-progress` or `--quiet` is passed
//! - the `UPDATER_NO_PROGRESS` environment variable is set
//! - stderr is not a terminal (indicatif draws nothing)

use crate::constants::NO_PROGRESS_ENV;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn is_progress_disabled() -> bool {
    std::env::var_os(NO_PROGRESS_ENV).is_some()
}

/// An animated spinner, or a hidden one when progress is disabled.
#[derive(Debug, Clone)]
pub struct Spinner {
    inner: ProgressBar,
}

impl Spinner {
    /// Start a spinner showing `message`. `enabled = false` hides it.
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        let inner = if enabled && !is_progress_disabled() {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };
        inner.set_message(message.into());
        Self { inner }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.inner.set_message(message.into());
    }

    /// Remove the spinner from the terminal.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}
