//! Terminal progress for lifecycle operations

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lifecycle::{Call, ProgressCallback};
use std::time::Duration;

/// Spinner-backed progress callback
///
/// Shows the call in flight and leaves one line per completed call. Hidden
/// when `quiet` is set, so only the final summary is printed.
pub struct CallProgress {
    bar: ProgressBar,
    total: usize,
    done: usize,
    failed: usize,
}

impl CallProgress {
    pub fn new(total: usize, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{pos}/{len}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };

        Self {
            bar,
            total,
            done: 0,
            failed: 0,
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
        log::debug!(
            "{} of {} planned calls issued, {} failed",
            self.done,
            self.total,
            self.failed
        );
    }
}

impl ProgressCallback for CallProgress {
    fn on_call_start(&mut self, call: &Call) {
        self.bar.set_message(call.to_string());
    }

    fn on_call_complete(&mut self, call: &Call, error: Option<&boardapi::Error>) {
        self.done += 1;
        self.bar.inc(1);

        let line = match error {
            None => format!("  {} {}", "✓".green(), call),
            Some(e) => {
                self.failed += 1;
                let mark = if call.is_fatal() { "✗".red() } else { "⚠".yellow() };
                format!("  {} {} ({})", mark, call, e.to_string().dimmed())
            }
        };
        self.bar.println(line);
    }
}

impl Drop for CallProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
