//! Availability engine.
//!
//! Pure functions over snapshots of events, items and reservations. Nothing
//! here performs I/O or reads the clock: "today" is always passed in, so the
//! same inputs always give the same answer.
//!
//! - [`calendar`]: whether a calendar date is booked, and month views
//! - [`stock`]: whether an item has enough free units on a date

pub mod calendar;
pub mod stock;

pub use calendar::{
    classify_date, is_date_available, is_date_occupied, month_calendar, occupied_dates,
    CalendarDay, DayStatus,
};
pub use stock::{
    check_availability, free_units, remaining_quantity, reserved_quantity, stock_levels,
    StockLevel,
};
