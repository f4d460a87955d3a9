//! Date occupancy.
//!
//! A date is occupied when any event on that calendar day is `CONFIRMED` or
//! `COMPLETED`. Quotes never block a date.

use crate::types::{Event, EventStatus};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// How a day shows up on a client's calendar
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DayStatus {
    /// The viewing client has a live event that day
    Owned,
    /// Someone else's event holds the date
    Occupied,
    /// Before today
    Past,
    /// Free to request
    Available,
}

impl DayStatus {
    /// Whether a booking request for the day would be accepted
    #[must_use]
    pub const fn is_bookable(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// One cell of a month view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalendarDay {
    /// The day
    pub date: NaiveDate,
    /// Its classification
    pub status: DayStatus,
}

/// Whether any event holds `date`.
#[must_use]
pub fn is_date_occupied(date: NaiveDate, events: &[Event]) -> bool {
    events
        .iter()
        .any(|event| event.event_date == date && event.status.blocks_calendar())
}

/// Whether `date` can still be requested: not before `today` and not occupied.
///
/// `today` itself is available.
#[must_use]
pub fn is_date_available(date: NaiveDate, today: NaiveDate, events: &[Event]) -> bool {
    date >= today && !is_date_occupied(date, events)
}

/// Classify a day for the client owning `own_events`.
///
/// Precedence is Owned, then Occupied, then Past, then Available. A
/// cancelled event of the client's does not make the day theirs.
#[must_use]
pub fn classify_date(
    date: NaiveDate,
    today: NaiveDate,
    all_events: &[Event],
    own_events: &[Event],
) -> DayStatus {
    let owned = own_events
        .iter()
        .any(|event| event.event_date == date && event.status != EventStatus::Cancelled);

    if owned {
        DayStatus::Owned
    } else if is_date_occupied(date, all_events) {
        DayStatus::Occupied
    } else if date < today {
        DayStatus::Past
    } else {
        DayStatus::Available
    }
}

/// Every day of `month` in `year`, classified.
///
/// Returns `None` for a month that does not exist.
#[must_use]
pub fn month_calendar(
    year: i32,
    month: u32,
    today: NaiveDate,
    all_events: &[Event],
    own_events: &[Event],
) -> Option<Vec<CalendarDay>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    Some(
        first
            .iter_days()
            .take_while(|day| day.month() == month)
            .map(|date| CalendarDay {
                date,
                status: classify_date(date, today, all_events, own_events),
            })
            .collect(),
    )
}

/// The set of occupied dates, in order.
#[must_use]
pub fn occupied_dates(events: &[Event]) -> BTreeSet<NaiveDate> {
    events
        .iter()
        .filter(|event| event.status.blocks_calendar())
        .map(|event| event.event_date)
        .collect()
}
