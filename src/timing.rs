/// What a throttled handler should do with an incoming event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Run the handler immediately.
    FireNow,
    /// Run once after this many milliseconds; later events in the window fold into it.
    Schedule(u32),
    /// A trailing run is already queued.
    Skip,
}

/// Leading and trailing rate limiter: at most one run per interval, and the
/// last event of a busy window is never lost.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: u64,
    last_run: Option<u64>,
    trailing: bool,
}

impl Throttle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: u64::from(interval_ms),
            last_run: None,
            trailing: false,
        }
    }

    pub fn call(&mut self, now_ms: u64) -> ThrottleDecision {
        if self.trailing {
            return ThrottleDecision::Skip;
        }
        match self.last_run {
            Some(last) if now_ms.saturating_sub(last) < self.interval_ms => {
                self.trailing = true;
                let wait = self.interval_ms - now_ms.saturating_sub(last);
                ThrottleDecision::Schedule(u32::try_from(wait).unwrap_or(u32::MAX))
            }
            _ => {
                self.last_run = Some(now_ms);
                ThrottleDecision::FireNow
            }
        }
    }

    /// Records that the scheduled trailing run happened.
    pub fn trailing_ran(&mut self, now_ms: u64) {
        self.trailing = false;
        self.last_run = Some(now_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_call_fires_immediately() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.call(5_000), ThrottleDecision::FireNow);
    }

    #[test]
    fn burst_collapses_into_one_trailing_run() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.call(0), ThrottleDecision::FireNow);
        assert_eq!(throttle.call(30), ThrottleDecision::Schedule(70));
        assert_eq!(throttle.call(60), ThrottleDecision::Skip);
        assert_eq!(throttle.call(99), ThrottleDecision::Skip);
        throttle.trailing_ran(100);
        assert_eq!(throttle.call(150), ThrottleDecision::Schedule(50));
    }

    #[test]
    fn quiet_interval_fires_again() {
        let mut throttle = Throttle::new(100);
        assert_eq!(throttle.call(0), ThrottleDecision::FireNow);
        assert_eq!(throttle.call(100), ThrottleDecision::FireNow);
        assert_eq!(throttle.call(250), ThrottleDecision::FireNow);
    }
}
