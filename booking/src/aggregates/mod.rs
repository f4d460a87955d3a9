//! Aggregate reducers for the venue.
//!
//! - Event: booking requests, owner-created events and their lifecycle
//! - Reservation: item reservations guarded by the stock check
//! - Client: client records; deletion is refused while events exist
//! - Notification: the signed-in user's inbox

pub mod client;
pub mod event;
pub mod notification;
pub mod reservation;

pub use client::{ClientAction, ClientBackend, ClientEnvironment, ClientReducer, ClientState};
pub use event::{EventAction, EventBackend, EventEnvironment, EventReducer, EventState};
pub use notification::{
    NotificationAction, NotificationBackend, NotificationEnvironment, NotificationReducer,
    NotificationState,
};
pub use reservation::{
    InventoryBackend, InventorySnapshot, ReservationAction, ReservationEnvironment,
    ReservationReducer, ReservationState,
};
