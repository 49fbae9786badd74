//! Call-rate limiters for input handlers.

use std::time::{Duration, Instant};

/// Trailing-edge debounce: `ready` reports true once no new trigger has
/// arrived for the whole quiet period, then resets.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending_since: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending_since: None,
        }
    }

    pub fn trigger(&mut self) {
        self.pending_since = Some(Instant::now());
    }

    pub fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    pub fn ready(&mut self) -> bool {
        match self.pending_since {
            Some(since) if since.elapsed() >= self.quiet => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

/// Leading-edge throttle: the first call passes, later ones are dropped until
/// the interval has elapsed.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last_allowed: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_allowed: None,
        }
    }

    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        match self.last_allowed {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_allowed = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn debounce_waits_for_quiet() {
        let mut debounce = Debouncer::new(Duration::from_millis(20));
        assert!(!debounce.ready());
        debounce.trigger();
        assert!(!debounce.ready());
        sleep(Duration::from_millis(30));
        assert!(debounce.ready());
        // consumed
        assert!(!debounce.ready());
    }

    #[test]
    fn retrigger_restarts_the_clock() {
        let mut debounce = Debouncer::new(Duration::from_millis(40));
        debounce.trigger();
        sleep(Duration::from_millis(25));
        debounce.trigger();
        sleep(Duration::from_millis(25));
        assert!(!debounce.ready());
        sleep(Duration::from_millis(25));
        assert!(debounce.ready());
    }

    #[test]
    fn throttle_drops_rapid_calls() {
        let mut throttle = Throttle::new(Duration::from_millis(30));
        assert!(throttle.allow());
        assert!(!throttle.allow());
        sleep(Duration::from_millis(40));
        assert!(throttle.allow());
    }
}
