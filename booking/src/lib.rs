//! Venue booking - availability engine, business rules and backend client
//!
//! Clients request dates for their events; the owner confirms, completes or
//! cancels them and reserves rentable items (chairs, tables, decoration) for
//! each event. The REST backend is the source of truth; this crate decides
//! what may be asked of it.
//!
//! # Architecture
//!
//! ```text
//!   CLI / front end
//!        │ actions
//!        ▼
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │    Event     │  │ Reservation  │  │    Client    │  │ Notification │
//! │   Reducer    │  │   Reducer    │  │   Reducer    │  │   Reducer    │
//! └──────────────┘  └──────────────┘  └──────────────┘  └──────────────┘
//!        │  uses            │ uses
//!        ▼                  ▼
//! ┌─────────────────────────────────┐
//! │ Availability engine (pure fns)  │
//! └─────────────────────────────────┘
//!        │ effects
//!        ▼
//! ┌─────────────────────────────────┐      ┌────────────────┐
//! │ ApiClient (REST, bearer token)  │ ───► │ SessionContext │
//! └─────────────────────────────────┘      └────────────────┘
//! ```
//!
//! # Key Rules
//!
//! - A date is occupied when a `CONFIRMED` or `COMPLETED` event holds it;
//!   quotes never block a date.
//! - Free units of an item on a date are `quantity_total` minus the active
//!   reservations of that item on that date. They are never stored.
//! - A client with events cannot be deleted.
//!
//! See [`availability`] for the engine and [`aggregates`] for the reducers.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregates;
pub mod api;
pub mod app;
pub mod availability;
pub mod billing;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use api::{ApiClient, ApiError};
pub use app::VenueApp;
pub use config::Config;
pub use error::{BookingError, ErrorKind};
pub use session::{Session, SessionContext};
