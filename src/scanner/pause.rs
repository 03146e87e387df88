use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

struct PauseAccounting {
    paused_since: Option<Instant>,
    total_paused: Duration,
}

/// Cooperative pause/resume gate for worker tasks. When paused, `wait()`
/// suspends until `toggle()` flips back to running; when running, `wait()`
/// is a subscribe plus a borrow.
pub struct Pauser {
    paused_tx: watch::Sender<bool>,
    accounting: Mutex<PauseAccounting>,
}

impl Default for Pauser {
    fn default() -> Self {
        Self::new()
    }
}

impl Pauser {
    pub fn new() -> Self {
        let (paused_tx, _) = watch::channel(false);
        Self {
            paused_tx,
            accounting: Mutex::new(PauseAccounting {
                paused_since: None,
                total_paused: Duration::ZERO,
            }),
        }
    }

    /// Suspends the caller while the scan is paused. Returns immediately
    /// when running.
    pub async fn wait(&self) {
        let mut rx = self.paused_tx.subscribe();
        while *rx.borrow() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Flips between paused and running, waking all waiters on resume.
    /// Returns the new state (true = now paused).
    pub fn toggle(&self) -> bool {
        let mut acc = self.accounting.lock().unwrap();
        let now_paused = !*self.paused_tx.borrow();
        if now_paused {
            acc.paused_since = Some(Instant::now());
        } else if let Some(since) = acc.paused_since.take() {
            acc.total_paused += since.elapsed();
        }
        let _ = self.paused_tx.send(now_paused);
        now_paused
    }

    pub fn is_paused(&self) -> bool {
        *self.paused_tx.borrow()
    }

    /// Total time spent paused, including any in-flight pause.
    pub fn paused_duration(&self) -> Duration {
        let acc = self.accounting.lock().unwrap();
        let mut total = acc.total_paused;
        if let Some(since) = acc.paused_since {
            total += since.elapsed();
        }
        total
    }

    /// Length of the current pause, or zero when running.
    pub fn current_pause_duration(&self) -> Duration {
        let acc = self.accounting.lock().unwrap();
        acc.paused_since.map(|since| since.elapsed()).unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn wait_returns_immediately_when_running() {
        let pauser = Pauser::new();
        tokio::time::timeout(Duration::from_millis(100), pauser.wait())
            .await
            .expect("wait() should not block while running");
    }

    #[tokio::test]
    async fn toggle_releases_all_waiters() {
        let pauser = Arc::new(Pauser::new());
        assert!(pauser.toggle());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let pauser = pauser.clone();
            handles.push(tokio::spawn(async move {
                pauser.wait().await;
            }));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pauser.toggle());

        for handle in handles {
            tokio::time::timeout(Duration::from_secs(1), handle)
                .await
                .expect("waiter not released after resume")
                .unwrap();
        }
    }

    #[tokio::test]
    async fn paused_duration_accumulates() {
        let pauser = Pauser::new();
        assert_eq!(pauser.paused_duration(), Duration::ZERO);
        assert_eq!(pauser.current_pause_duration(), Duration::ZERO);

        pauser.toggle();
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(pauser.current_pause_duration() >= Duration::from_millis(30));
        pauser.toggle();

        let after_first = pauser.paused_duration();
        assert!(after_first >= Duration::from_millis(30));
        assert_eq!(pauser.current_pause_duration(), Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(pauser.paused_duration(), after_first);
    }
}
