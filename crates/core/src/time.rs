use chrono::{DateTime, Duration, Utc};

/// A simple clock abstraction for deterministic time in services and tests.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(DateTime<Utc>),
}

impl Clock {
    /// Returns a clock that uses the current system time.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed at the given timestamp.
    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    /// Returns the current time according to the clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::Default => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// If this is a fixed clock, advance it by the given duration.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// A wall-clock-anchored point in time after which an attempt auto-submits.
///
/// The countdown recomputes remaining seconds from this anchor on every tick
/// instead of decrementing a counter, so scheduling jitter and suspended
/// windows cannot drift the timer over a long quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(DateTime<Utc>);

impl Deadline {
    /// A deadline at the given instant.
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// A deadline `minutes` from `now`.
    #[must_use]
    pub fn after_minutes(now: DateTime<Utc>, minutes: u32) -> Self {
        Self(now + Duration::seconds(i64::from(minutes) * 60))
    }

    #[must_use]
    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Whole seconds left until the deadline, clamped at zero.
    #[must_use]
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> u64 {
        let left = (self.0 - now).num_seconds();
        u64::try_from(left).unwrap_or(0)
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining_seconds(now) == 0
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// Returns a `Clock` fixed at the deterministic test timestamp.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_counts_down_from_anchor() {
        let start = fixed_now();
        let deadline = Deadline::after_minutes(start, 5);

        assert_eq!(deadline.remaining_seconds(start), 300);
        assert_eq!(
            deadline.remaining_seconds(start + Duration::seconds(299)),
            1
        );
        assert!(!deadline.is_expired(start + Duration::seconds(299)));
        assert!(deadline.is_expired(start + Duration::seconds(300)));
    }

    #[test]
    fn remaining_clamps_at_zero_after_expiry() {
        let start = fixed_now();
        let deadline = Deadline::after_minutes(start, 1);
        assert_eq!(
            deadline.remaining_seconds(start + Duration::seconds(90)),
            0
        );
    }

    #[test]
    fn remaining_is_monotonically_non_increasing() {
        let start = fixed_now();
        let deadline = Deadline::after_minutes(start, 2);
        let mut prev = deadline.remaining_seconds(start);
        for s in 1..=150 {
            let now = start + Duration::seconds(s);
            let left = deadline.remaining_seconds(now);
            assert!(left <= prev);
            prev = left;
        }
        assert_eq!(prev, 0);
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        let before = clock.now();
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), before + Duration::seconds(30));
    }
}
