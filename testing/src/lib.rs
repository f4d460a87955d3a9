//! # Venue Testing
//!
//! Testing utilities for venue reducers and stores:
//! - [`FixedClock`] for deterministic "today" computations
//! - [`ReducerTest`] for Given-When-Then reducer tests
//! - [`assertions`] for checking returned effects
//!
//! ## Example
//!
//! ```ignore
//! use venue_testing::{test_clock, ReducerTest};
//!
//! ReducerTest::new(ReservationReducer::new())
//!     .with_env(env)
//!     .given_state(state)
//!     .when_action(ReservationAction::CreateReservation { .. })
//!     .then_state(|state| assert!(state.last_error.is_some()))
//!     .run();
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use venue_core::environment::Clock;

mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, NaiveDate, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use venue_testing::mocks::FixedClock;
    /// use venue_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }

        /// A clock standing at noon UTC on `date`.
        ///
        /// Noon keeps the calendar day stable for any offset within ±11h.
        #[must_use]
        pub fn at_noon(date: NaiveDate) -> Self {
            Self::new(
                date.and_hms_opt(12, 0, 0)
                    .unwrap_or_default()
                    .and_utc(),
            )
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Default fixed clock for tests: 2026-03-10 12:00:00 UTC.
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::at_noon(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap_or_default())
    }
}

/// Shorthand for building a calendar date in tests.
///
/// # Panics
///
/// Panics if the date does not exist.
#[must_use]
#[allow(clippy::expect_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("test date must exist")
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().date_naive(), date(2026, 3, 10));
    }
}
