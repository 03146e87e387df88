use std::sync::Mutex;
use std::time::Duration;

use log::warn;

const MAX_DELAY: Duration = Duration::from_secs(30);
const BACKOFF_FLOOR: Duration = Duration::from_millis(500);

struct ThrottleState {
    current_delay: Duration,
    /// Consecutive throttle signals (429/503 or request errors).
    consecutive: u32,
}

/// Adaptive rate limiter. On 429/503 (or repeated connection errors) the
/// per-request delay doubles up to 30s; healthy responses halve it back
/// toward the configured base delay.
pub struct Throttler {
    base_delay: Duration,
    enabled: bool,
    state: Mutex<ThrottleState>,
}

impl Throttler {
    pub fn new(base_delay: Duration, enabled: bool) -> Self {
        Self {
            base_delay,
            enabled,
            state: Mutex::new(ThrottleState {
                current_delay: base_delay,
                consecutive: 0,
            }),
        }
    }

    /// Current per-request delay. Workers await this before each request.
    pub fn delay(&self) -> Duration {
        if !self.enabled {
            return self.base_delay;
        }
        self.state.lock().unwrap().current_delay
    }

    /// Updates the throttler from a response status code.
    pub fn record_status(&self, status_code: u16) {
        if !self.enabled {
            return;
        }
        let mut state = self.state.lock().unwrap();
        if status_code == 429 || status_code == 503 {
            state.consecutive += 1;
            let backed_off = Self::backoff(state.current_delay);
            if backed_off != state.current_delay {
                state.current_delay = backed_off;
                warn!("rate limited (HTTP {status_code}), backing off to {:?}/req", state.current_delay);
            }
        } else if state.consecutive > 0 {
            state.consecutive = 0;
            let recovered = (state.current_delay / 2).max(self.base_delay);
            state.current_delay = recovered;
        }
    }

    /// Flags a connection error (timeout, reset) as a possible rate limit
    /// signal. Backs off from the third consecutive error onward.
    pub fn record_error(&self) {
        if !self.enabled {
            return;
        }
        let mut state = self.state.lock().unwrap();
        state.consecutive += 1;
        if state.consecutive >= 3 {
            let backed_off = Self::backoff(state.current_delay);
            if backed_off != state.current_delay {
                state.current_delay = backed_off;
                warn!("repeated request errors, backing off to {:?}/req", state.current_delay);
            }
        }
    }

    fn backoff(current: Duration) -> Duration {
        (current * 2).max(BACKOFF_FLOOR).min(MAX_DELAY)
    }
}
