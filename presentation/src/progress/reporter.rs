//! Progress reporting while a response is being prepared

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner shown between submitting a message and the first response text
pub struct ProgressReporter {
    enabled: bool,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            enabled: true,
            spinner: Mutex::new(None),
        }
    }

    /// A reporter that never draws anything (`--quiet`).
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            spinner: Mutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Show a spinner with `message`, replacing any spinner already shown.
    pub fn start(&self, message: impl Into<String>) {
        if !self.enabled {
            return;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(100));

        let previous = self.lock().replace(pb);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    /// Change the message of the running spinner.
    pub fn set_message(&self, message: impl Into<String>) {
        if let Some(pb) = self.lock().as_ref() {
            pb.set_message(message.into());
        }
    }

    /// Remove the spinner from the terminal.
    pub fn stop(&self) {
        if let Some(pb) = self.lock().take() {
            pb.finish_and_clear();
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.spinner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.stop();
    }
}
