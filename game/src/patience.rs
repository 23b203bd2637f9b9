use std::time::Duration;

/// Countdown shared by whichever task is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PatienceClock {
    remaining: Duration,
    max: Duration,
}

impl PatienceClock {
    pub(crate) const fn full() -> Self {
        Self {
            remaining: Duration::from_secs(1),
            max: Duration::from_secs(1),
        }
    }

    /// Re-arms the clock for a freshly assigned task.
    pub(crate) fn arm(&mut self, budget: Duration) {
        self.max = budget;
        self.remaining = budget;
    }

    /// Raises the remaining time to at least `floor`; never lowers it.
    pub(crate) fn ensure_at_least(&mut self, floor: Duration) {
        self.remaining = self.remaining.max(floor);
    }

    /// Counts down by `dt` and reports whether patience ran out.
    ///
    /// Developer mode pins the clock at its maximum instead.
    pub(crate) fn tick(&mut self, dt: Duration, dev_mode: bool) -> bool {
        if dev_mode {
            self.remaining = self.max;
            return false;
        }
        self.remaining = self.remaining.saturating_sub(dt);
        self.remaining.is_zero()
    }

    pub(crate) const fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Remaining share of the armed budget, clamped to `[0, 1]`.
    pub(crate) fn fraction(&self) -> f32 {
        if self.max.is_zero() {
            return 1.0;
        }
        (self.remaining.as_secs_f32() / self.max.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_expires_exactly_at_zero() {
        let mut clock = PatienceClock::full();
        clock.arm(Duration::from_millis(100));
        assert!(!clock.tick(Duration::from_millis(60), false));
        assert!(clock.tick(Duration::from_millis(40), false));
        assert_eq!(clock.fraction(), 0.0);
    }

    #[test]
    fn delivery_floor_never_lowers() {
        let mut clock = PatienceClock::full();
        clock.arm(Duration::from_secs(12));
        assert!(!clock.tick(Duration::from_secs(10), false));
        clock.ensure_at_least(Duration::from_secs(5));
        assert_eq!(clock.remaining(), Duration::from_secs(5));

        clock.arm(Duration::from_secs(12));
        clock.ensure_at_least(Duration::from_secs(5));
        assert_eq!(clock.remaining(), Duration::from_secs(12));
    }

    #[test]
    fn developer_mode_pins_to_max() {
        let mut clock = PatienceClock::full();
        clock.arm(Duration::from_secs(9));
        assert!(!clock.tick(Duration::from_secs(4), false));
        assert!(!clock.tick(Duration::from_secs(60), true));
        assert_eq!(clock.remaining(), Duration::from_secs(9));
        assert_eq!(clock.fraction(), 1.0);
    }

    #[test]
    fn raised_floor_reports_full_fraction() {
        let mut clock = PatienceClock::full();
        clock.arm(Duration::from_secs(3));
        clock.ensure_at_least(Duration::from_secs(5));
        assert_eq!(clock.fraction(), 1.0);
    }
}
