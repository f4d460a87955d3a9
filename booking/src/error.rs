//! Booking errors surfaced to users.

use crate::api::ApiError;
use crate::types::{ClientId, EventId, EventStatus, ItemId, ReservationId};
use chrono::NaiveDate;
use thiserror::Error;

/// Broad category of a [`BookingError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport failures and unexpected backend responses
    Network,
    /// Missing or malformed input
    Validation,
    /// Input is well formed but a business rule forbids it
    BusinessRule,
}

/// Errors raised by booking operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// A field is missing or invalid
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// No event with this id is known
    #[error("Event {0} not found")]
    EventNotFound(EventId),

    /// No item with this id is known
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    /// No reservation with this id is known
    #[error("Reservation {0} not found")]
    ReservationNotFound(ReservationId),

    /// No client with this id is known
    #[error("Client {0} not found")]
    ClientNotFound(ClientId),

    /// Another event already holds the date
    #[error("Date {date} is already booked")]
    DateOccupied {
        /// Requested date
        date: NaiveDate,
    },

    /// The date is before today
    #[error("Date {date} is in the past")]
    DateInPast {
        /// Requested date
        date: NaiveDate,
    },

    /// Not enough units left for the date
    #[error("Item {item_id} has {available} units left on {date}, {requested} requested")]
    InsufficientStock {
        /// Requested item
        item_id: ItemId,
        /// Event date
        date: NaiveDate,
        /// Units requested
        requested: u32,
        /// Units still free; negative if the item is already overbooked
        available: i64,
    },

    /// The event's status does not accept reservations
    #[error("Event {event_id} is {status} and accepts no reservations")]
    EventNotReservable {
        /// Target event
        event_id: EventId,
        /// Its current status
        status: EventStatus,
    },

    /// A status change outside the lifecycle
    #[error("{entity} cannot move from {from} to {to}")]
    InvalidTransition {
        /// "event" or "reservation"
        entity: &'static str,
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// The event still holds item reservations on its current date
    #[error("Event {event_id} has {active} active reservations")]
    EventHasReservations {
        /// Event being moved
        event_id: EventId,
        /// Reservations not yet returned
        active: usize,
    },

    /// The client still has events
    #[error("Client {client_id} has {events_count} events")]
    ClientHasEvents {
        /// Client to delete
        client_id: ClientId,
        /// Linked events
        events_count: u32,
    },

    /// The backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl BookingError {
    /// Shorthand for a [`BookingError::Validation`]
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Category of the error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::DateInPast { .. } => ErrorKind::Validation,
            Self::Api(_) => ErrorKind::Network,
            Self::EventNotFound(_)
            | Self::ItemNotFound(_)
            | Self::ReservationNotFound(_)
            | Self::ClientNotFound(_)
            | Self::DateOccupied { .. }
            | Self::InsufficientStock { .. }
            | Self::EventNotReservable { .. }
            | Self::InvalidTransition { .. }
            | Self::EventHasReservations { .. }
            | Self::ClientHasEvents { .. } => ErrorKind::BusinessRule,
        }
    }

    /// Message suitable for showing to the person at the keyboard
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::EventNotFound(_) => "This event no longer exists.".to_string(),
            Self::ItemNotFound(_) => "This item no longer exists.".to_string(),
            Self::ReservationNotFound(_) => "This reservation no longer exists.".to_string(),
            Self::ClientNotFound(_) => "This client no longer exists.".to_string(),
            Self::DateOccupied { date } => {
                format!("{} is already booked. Please choose another date.", date.format("%d/%m/%Y"))
            },
            Self::DateInPast { date } => {
                format!("{} is in the past. Please choose a future date.", date.format("%d/%m/%Y"))
            },
            Self::InsufficientStock {
                date, available, ..
            } => format!(
                "Not enough units available on {}: only {} left.",
                date.format("%d/%m/%Y"),
                (*available).max(0)
            ),
            Self::EventNotReservable { status, .. } => {
                format!("Items cannot be reserved for an event that is {status}.")
            },
            Self::InvalidTransition { entity, from, to } => {
                format!("A {entity} cannot change from {from} to {to}.")
            },
            Self::EventHasReservations { active, .. } => format!(
                "This event has {active} item reservations. Return them before changing its date."
            ),
            Self::ClientHasEvents { events_count, .. } => format!(
                "This client has {events_count} linked events and cannot be deleted."
            ),
            Self::Api(error) => error.user_message(),
        }
    }
}
