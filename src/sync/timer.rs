/// A one-shot deadline that can be started, restarted, and cancelled.
///
/// Time is supplied by the caller as milliseconds since some fixed start,
/// the same clock the event loop uses for its other debouncers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelableTimer {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl CancelableTimer {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    pub const fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Arm the timer. A pending deadline is discarded and the full delay
    /// starts over from `now_ms`.
    pub const fn start(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    pub const fn cancel(&mut self) {
        self.deadline = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Fire at most once: returns `true` and disarms when the deadline
    /// has been reached.
    pub fn take_ready(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_timer_is_idle() {
        let mut timer = CancelableTimer::new(66);
        assert!(!timer.is_pending());
        assert!(!timer.take_ready(1_000));
    }

    #[test]
    fn test_timer_fires_once_after_delay() {
        let mut timer = CancelableTimer::new(66);
        timer.start(100);
        assert_eq!(timer.deadline(), Some(166));
        assert!(!timer.take_ready(165));
        assert!(timer.take_ready(166));
        assert!(!timer.take_ready(200));
    }

    #[test]
    fn test_restart_pushes_deadline_out() {
        let mut timer = CancelableTimer::new(66);
        timer.start(0);
        timer.start(50);
        assert!(!timer.take_ready(66));
        assert!(timer.take_ready(116));
    }

    #[test]
    fn test_cancel_discards_deadline() {
        let mut timer = CancelableTimer::new(10);
        timer.start(0);
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.take_ready(100));
    }
}
