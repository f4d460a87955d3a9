//! Reservation aggregate.
//!
//! Commits units of an inventory item to an event on the event's date.
//! Creating a reservation never oversells: the stock check counts committed
//! reservations plus requests still in flight to the backend, so two quick
//! requests for the last units cannot both pass.
//!
//! **Consistency**: the backend is the source of truth. A created
//! reservation is added to local state only once the backend returns it; a
//! failed request leaves state untouched apart from `last_error`.

use crate::api::ApiError;
use crate::availability::{check_availability, free_units, stock_levels, StockLevel};
use crate::error::BookingError;
use crate::types::{
    Event, EventId, Item, ItemId, ItemReservation, NewReservation, ReservationId,
    ReservationStatus,
};
use chrono::NaiveDate;
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;
use venue_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

// ============================================================================
// Backend Trait
// ============================================================================

/// Backend operations the reservation aggregate needs.
///
/// Returns `BoxFuture` instead of async fn to be dyn-compatible.
pub trait InventoryBackend: Send + Sync {
    /// All inventory items
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_items(&self) -> BoxFuture<'_, Result<Vec<Item>, ApiError>>;

    /// All events
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_events(&self) -> BoxFuture<'_, Result<Vec<Event>, ApiError>>;

    /// All item reservations
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_reservations(&self) -> BoxFuture<'_, Result<Vec<ItemReservation>, ApiError>>;

    /// Create a reservation
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn create_reservation<'a>(
        &'a self,
        request: &'a NewReservation,
    ) -> BoxFuture<'a, Result<ItemReservation, ApiError>>;

    /// Move a reservation to `status`
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn update_reservation_status(
        &self,
        reservation_id: ReservationId,
        status: ReservationStatus,
    ) -> BoxFuture<'_, Result<ItemReservation, ApiError>>;
}

// ============================================================================
// State
// ============================================================================

/// Everything the stock check reads, fetched together
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Items
    pub items: Vec<Item>,
    /// Events
    pub events: Vec<Event>,
    /// Reservations
    pub reservations: Vec<ItemReservation>,
}

/// State of the reservation aggregate
#[derive(Clone, Debug, Default)]
pub struct ReservationState {
    /// Items by id
    pub items: BTreeMap<ItemId, Item>,
    /// Events by id
    pub events: BTreeMap<EventId, Event>,
    /// Reservations by id
    pub reservations: BTreeMap<ReservationId, ItemReservation>,
    /// Requests sent to the backend and not yet answered, by request id
    pub pending: BTreeMap<u64, NewReservation>,
    /// Whether a snapshot load is running
    pub loading: bool,
    /// Most recent failure, for display
    pub last_error: Option<BookingError>,
    next_request_id: u64,
}

impl ReservationState {
    /// State holding `snapshot`
    #[must_use]
    pub fn from_snapshot(snapshot: InventorySnapshot) -> Self {
        let mut state = Self::default();
        state.replace_snapshot(snapshot);
        state
    }

    fn replace_snapshot(&mut self, snapshot: InventorySnapshot) {
        self.items = snapshot.items.into_iter().map(|item| (item.id, item)).collect();
        self.events = snapshot.events.into_iter().map(|event| (event.id, event)).collect();
        let reservations: BTreeMap<ReservationId, ItemReservation> = snapshot
            .reservations
            .into_iter()
            .map(|reservation| (reservation.id, reservation))
            .collect();

        // A pending request the backend already stored arrives here as a new
        // reservation; it must not count twice.
        for reservation in reservations.values() {
            if self.reservations.contains_key(&reservation.id) {
                continue;
            }
            let stored = self
                .pending
                .iter()
                .find(|(_, request)| request.matches(reservation))
                .map(|(request_id, _)| *request_id);
            if let Some(request_id) = stored {
                self.pending.remove(&request_id);
            }
        }
        self.reservations = reservations;
    }

    /// Reservations as a list, ordered by id
    #[must_use]
    pub fn reservation_list(&self) -> Vec<ItemReservation> {
        self.reservations.values().cloned().collect()
    }

    /// Reservations of one event
    #[must_use]
    pub fn reservations_for_event(&self, event_id: EventId) -> Vec<ItemReservation> {
        self.reservations
            .values()
            .filter(|reservation| reservation.event_id == event_id)
            .cloned()
            .collect()
    }

    /// Units of `item_id` on `date` requested but not yet confirmed by the backend
    #[must_use]
    pub fn pending_quantity(&self, item_id: ItemId, date: NaiveDate) -> u32 {
        self.pending
            .values()
            .filter(|request| request.item_id == item_id && request.event_date == date)
            .fold(0, |sum, request| sum.saturating_add(request.quantity))
    }

    /// Whether `quantity` more units of `item_id` fit on `date`, counting
    /// in-flight requests. Unknown items never fit.
    #[must_use]
    pub fn can_reserve(&self, item_id: ItemId, date: NaiveDate, quantity: u32) -> bool {
        self.items.get(&item_id).is_some_and(|item| {
            let wanted = quantity.saturating_add(self.pending_quantity(item_id, date));
            check_availability(item, date, wanted, &self.reservation_list())
        })
    }

    /// Stock of every item on `date`
    #[must_use]
    pub fn stock_on(&self, date: NaiveDate) -> Vec<StockLevel> {
        let items: Vec<Item> = self.items.values().cloned().collect();
        stock_levels(&items, date, &self.reservation_list())
    }
}

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the reservation aggregate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReservationAction {
    // Commands
    /// Fetch items, events and reservations from the backend
    LoadSnapshot,

    /// Reserve units of an item for an event
    CreateReservation {
        /// Item to reserve
        item_id: ItemId,
        /// Event the units are for
        event_id: EventId,
        /// Number of units
        quantity: u32,
    },

    /// Move a reservation along its lifecycle
    ChangeReservationStatus {
        /// Reservation to change
        reservation_id: ReservationId,
        /// Target status
        status: ReservationStatus,
    },

    // Events
    /// Snapshot arrived from the backend
    SnapshotLoaded {
        /// Fresh data
        snapshot: InventorySnapshot,
    },

    /// The backend created the reservation
    ReservationCreated {
        /// Request that produced it
        request_id: u64,
        /// Created record
        reservation: ItemReservation,
    },

    /// The backend refused or never answered the creation request
    ReservationFailed {
        /// Request that failed
        request_id: u64,
        /// Why
        error: BookingError,
    },

    /// The backend changed the reservation's status
    ReservationStatusChanged {
        /// Updated record
        reservation: ItemReservation,
    },

    /// A command was rejected before reaching the backend
    ValidationFailed {
        /// Why
        error: BookingError,
    },

    /// A load or status change failed at the backend
    OperationFailed {
        /// Why
        error: BookingError,
    },
}

// ============================================================================
// Environment
// ============================================================================

/// Dependencies of the reservation aggregate
#[derive(Clone)]
pub struct ReservationEnvironment {
    /// Backend the reservations live in
    pub backend: Arc<dyn InventoryBackend>,
}

impl ReservationEnvironment {
    /// Creates a new `ReservationEnvironment`
    #[must_use]
    pub fn new(backend: Arc<dyn InventoryBackend>) -> Self {
        Self { backend }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the reservation aggregate
#[derive(Clone, Debug, Default)]
pub struct ReservationReducer;

impl ReservationReducer {
    /// Creates a new `ReservationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks run before any backend call, in order: quantity, event, item, stock.
    fn validate_create(
        state: &ReservationState,
        item_id: ItemId,
        event_id: EventId,
        quantity: u32,
    ) -> Result<NewReservation, BookingError> {
        if quantity == 0 {
            return Err(BookingError::validation(
                "quantity",
                "Quantity must be greater than zero.",
            ));
        }

        let event = state
            .events
            .get(&event_id)
            .ok_or(BookingError::EventNotFound(event_id))?;
        if !event.status.accepts_reservations() {
            return Err(BookingError::EventNotReservable {
                event_id,
                status: event.status,
            });
        }

        let item = state
            .items
            .get(&item_id)
            .ok_or(BookingError::ItemNotFound(item_id))?;

        let date = event.event_date;
        if !state.can_reserve(item_id, date, quantity) {
            let available = free_units(item, date, &state.reservation_list())
                - i64::from(state.pending_quantity(item_id, date));
            return Err(BookingError::InsufficientStock {
                item_id,
                date,
                requested: quantity,
                available,
            });
        }

        Ok(NewReservation {
            item_id,
            event_id,
            event_date: date,
            quantity,
            status: ReservationStatus::Reserved,
        })
    }

    fn validate_status_change(
        state: &ReservationState,
        reservation_id: ReservationId,
        status: ReservationStatus,
    ) -> Result<(), BookingError> {
        let reservation = state
            .reservations
            .get(&reservation_id)
            .ok_or(BookingError::ReservationNotFound(reservation_id))?;

        if reservation.status.can_transition_to(status) {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                entity: "reservation",
                from: reservation.status.to_string(),
                to: status.to_string(),
            })
        }
    }

    /// Apply an event to state
    fn apply_event(state: &mut ReservationState, action: &ReservationAction) {
        match action {
            ReservationAction::SnapshotLoaded { snapshot } => {
                state.replace_snapshot(snapshot.clone());
                state.loading = false;
                state.last_error = None;
            },
            ReservationAction::ReservationCreated {
                request_id,
                reservation,
            } => {
                state.pending.remove(request_id);
                state.reservations.insert(reservation.id, reservation.clone());
                state.last_error = None;
            },
            ReservationAction::ReservationFailed { request_id, error } => {
                state.pending.remove(request_id);
                state.last_error = Some(error.clone());
            },
            ReservationAction::ReservationStatusChanged { reservation } => {
                state.reservations.insert(reservation.id, reservation.clone());
                state.last_error = None;
            },
            ReservationAction::ValidationFailed { error }
            | ReservationAction::OperationFailed { error } => {
                state.loading = false;
                state.last_error = Some(error.clone());
            },
            // Commands don't modify state
            ReservationAction::LoadSnapshot
            | ReservationAction::CreateReservation { .. }
            | ReservationAction::ChangeReservationStatus { .. } => {},
        }
    }
}

fn operation_failed(error: ApiError) -> Option<ReservationAction> {
    Some(ReservationAction::OperationFailed {
        error: error.into(),
    })
}

impl Reducer for ReservationReducer {
    type State = ReservationState;
    type Action = ReservationAction;
    type Environment = ReservationEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            ReservationAction::LoadSnapshot => {
                state.loading = true;
                let backend = Arc::clone(&env.backend);

                smallvec![Effect::future(async move {
                    let loaded = futures::try_join!(
                        backend.fetch_items(),
                        backend.fetch_events(),
                        backend.fetch_reservations(),
                    );
                    match loaded {
                        Ok((items, events, reservations)) => Some(ReservationAction::SnapshotLoaded {
                            snapshot: InventorySnapshot {
                                items,
                                events,
                                reservations,
                            },
                        }),
                        Err(error) => operation_failed(error),
                    }
                })]
            },

            ReservationAction::CreateReservation {
                item_id,
                event_id,
                quantity,
            } => {
                let request = match Self::validate_create(state, item_id, event_id, quantity) {
                    Ok(request) => request,
                    Err(error) => {
                        tracing::warn!(
                            %item_id,
                            %event_id,
                            quantity,
                            %error,
                            "Reservation rejected"
                        );
                        Self::apply_event(state, &ReservationAction::ValidationFailed { error });
                        return SmallVec::new();
                    },
                };

                let request_id = state.next_request_id;
                state.next_request_id += 1;
                state.pending.insert(request_id, request.clone());
                state.last_error = None;

                let backend = Arc::clone(&env.backend);
                smallvec![Effect::future(async move {
                    match backend.create_reservation(&request).await {
                        Ok(reservation) => Some(ReservationAction::ReservationCreated {
                            request_id,
                            reservation,
                        }),
                        Err(error) => Some(ReservationAction::ReservationFailed {
                            request_id,
                            error: error.into(),
                        }),
                    }
                })]
            },

            ReservationAction::ChangeReservationStatus {
                reservation_id,
                status,
            } => {
                if let Err(error) = Self::validate_status_change(state, reservation_id, status) {
                    tracing::warn!(%reservation_id, %status, %error, "Status change rejected");
                    Self::apply_event(state, &ReservationAction::ValidationFailed { error });
                    return SmallVec::new();
                }

                let backend = Arc::clone(&env.backend);
                smallvec![Effect::future(async move {
                    match backend.update_reservation_status(reservation_id, status).await {
                        Ok(reservation) => {
                            Some(ReservationAction::ReservationStatusChanged { reservation })
                        },
                        Err(error) => operation_failed(error),
                    }
                })]
            },

            // ========== Events ==========
            event => {
                Self::apply_event(state, &event);
                smallvec![Effect::None]
            },
        }
    }
}
