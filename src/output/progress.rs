use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::time::Instant;

use crate::scanner::Pauser;

/// Progress display on stderr with pause-aware throughput and ETA. Elapsed
/// time excludes everything spent paused, so pausing neither inflates the
/// ETA nor trips the ETA abort.
pub struct Progress {
    bar: ProgressBar,
    start: Instant,
    total: AtomicU64,
    completed: AtomicU64,
    found: AtomicU64,
    filtered: AtomicU64,
    errors: AtomicU64,
    pauser: Option<Arc<Pauser>>,
    quiet: bool,
}

impl Progress {
    pub fn new(total: usize, quiet: bool, pauser: Option<Arc<Pauser>>) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(total as u64);
            bar.set_draw_target(ProgressDrawTarget::stderr());
            if let Ok(style) = ProgressStyle::with_template("{bar:20} {percent:>3}% | {pos}/{len} | {msg}") {
                bar.set_style(style.progress_chars("=> "));
            }
            bar.enable_steady_tick(Duration::from_millis(500));
            bar
        };
        Self {
            bar,
            start: Instant::now(),
            total: AtomicU64::new(total as u64),
            completed: AtomicU64::new(0),
            found: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            pauser,
            quiet,
        }
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.bar.inc(1);
        self.refresh_message();
    }

    pub fn increment_found(&self) {
        self.found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Grows the total when recursion or crawl adds work.
    pub fn add_total(&self, n: usize) {
        let total = self.total.fetch_add(n as u64, Ordering::Relaxed) + n as u64;
        self.bar.set_length(total);
    }

    /// Prints a line above the progress bar without tearing it.
    pub fn println(&self, msg: &str) {
        if self.quiet {
            eprintln!("{msg}");
        } else {
            self.bar.println(msg);
        }
    }

    /// Runs a closure with the bar cleared, for writers printing to the
    /// terminal.
    pub fn suspend<T>(&self, f: impl FnOnce() -> T) -> T {
        self.bar.suspend(f)
    }

    /// Wall time spent scanning, excluding paused time.
    fn active_elapsed(&self) -> Duration {
        let elapsed = self.start.elapsed();
        let paused = self
            .pauser
            .as_ref()
            .map(|p| p.paused_duration())
            .unwrap_or(Duration::ZERO);
        elapsed.saturating_sub(paused)
    }

    /// Requests per second over the active (unpaused) elapsed time.
    pub fn rate(&self) -> f64 {
        let secs = self.active_elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.completed() as f64 / secs
    }

    /// Projected remaining time at the current rate. Zero until there is
    /// enough data to estimate.
    pub fn eta(&self) -> Duration {
        let completed = self.completed();
        let rate = self.rate();
        if completed == 0 || rate <= 0.0 {
            return Duration::ZERO;
        }
        let total = self.total.load(Ordering::Relaxed);
        let remaining = total.saturating_sub(completed) as f64 / rate;
        Duration::from_secs_f64(remaining)
    }

    fn refresh_message(&self) {
        if self.quiet {
            return;
        }
        let mut msg = format!(
            "{:.0} req/s | Found: {} | Filtered: {} | Errors: {}",
            self.rate(),
            self.found.load(Ordering::Relaxed),
            self.filtered.load(Ordering::Relaxed),
            self.errors.load(Ordering::Relaxed),
        );
        let eta = self.eta();
        if !eta.is_zero() {
            msg.push_str(&format!(" | ETA: {}s", eta.as_secs()));
        }
        if let Some(pauser) = self.pauser.as_ref() {
            if pauser.is_paused() {
                msg.push_str(&format!(
                    " [PAUSED {}s]",
                    pauser.current_pause_duration().as_secs()
                ));
            }
        }
        self.bar.set_message(msg);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
