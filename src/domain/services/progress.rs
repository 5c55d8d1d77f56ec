//! Transfer progress throttling
//!
//! Backends call back on every chunk; observers only want a status line
//! every few seconds. The throttle decides which callbacks get through.

use std::time::{Duration, Instant};

/// Default interval between progress reports for one item
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Rate limiter for `(bytes_done, bytes_total)` callbacks of a single item
///
/// Lets through at most one report per interval, and always lets through
/// the completion report (`bytes_done == bytes_total`) exactly once.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    interval: Duration,
    last_emit: Option<Instant>,
    completed: bool,
}

impl ProgressThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            completed: false,
        }
    }

    /// Decide whether to report, using the current time
    pub fn should_report(&mut self, bytes_done: u64, bytes_total: u64) -> bool {
        self.should_report_at(Instant::now(), bytes_done, bytes_total)
    }

    /// Decide whether to report at a given instant
    pub fn should_report_at(&mut self, now: Instant, bytes_done: u64, bytes_total: u64) -> bool {
        if self.completed {
            return false;
        }

        if bytes_done >= bytes_total {
            self.completed = true;
            self.last_emit = Some(now);
            return true;
        }

        let due = match self.last_emit {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        };
        if due {
            self.last_emit = Some(now);
        }
        due
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_report_passes() {
        let mut throttle = ProgressThrottle::default();
        assert!(throttle.should_report_at(Instant::now(), 10, 100));
    }

    #[test]
    fn reports_within_interval_are_dropped() {
        let start = Instant::now();
        let mut throttle = ProgressThrottle::new(Duration::from_secs(5));

        assert!(throttle.should_report_at(start, 1, 100));
        assert!(!throttle.should_report_at(start + Duration::from_secs(1), 20, 100));
        assert!(!throttle.should_report_at(start + Duration::from_millis(4999), 40, 100));
        assert!(throttle.should_report_at(start + Duration::from_secs(5), 50, 100));
        assert!(!throttle.should_report_at(start + Duration::from_secs(6), 60, 100));
    }

    #[test]
    fn completion_always_reported_once() {
        let start = Instant::now();
        let mut throttle = ProgressThrottle::new(Duration::from_secs(5));

        assert!(throttle.should_report_at(start, 1, 100));
        assert!(throttle.should_report_at(start, 100, 100));
        assert!(!throttle.should_report_at(start + Duration::from_secs(60), 100, 100));
    }

    #[test]
    fn empty_file_reports_completion() {
        let mut throttle = ProgressThrottle::default();
        assert!(throttle.should_report_at(Instant::now(), 0, 0));
    }
}
