//! Event aggregate.
//!
//! Owns the venue calendar: booking requests from clients, events created by
//! the owner, and status changes along
//!
//! ```text
//! QUOTE ──► CONFIRMED ──► COMPLETED
//!   │           │
//!   └───────────┴──────► CANCELLED
//! ```
//!
//! At most one event may hold a date. That is checked here, when an event is
//! confirmed or a confirmed event moves, against the events this store knows.
//! An event keeps its date while it still has active item reservations;
//! those are committed to the old day and must be returned first.

use crate::api::ApiError;
use crate::availability::{is_date_available, is_date_occupied};
use crate::error::BookingError;
use crate::types::{Event, EventDraft, EventId, EventStatus, ItemReservation};
use chrono::{FixedOffset, NaiveDate};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;
use venue_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};

/// Backend operations the event aggregate needs.
///
/// Returns `BoxFuture` instead of async fn to be dyn-compatible.
pub trait EventBackend: Send + Sync {
    /// All events
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_events(&self) -> BoxFuture<'_, Result<Vec<Event>, ApiError>>;

    /// Create an event
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn create_event<'a>(&'a self, draft: &'a EventDraft) -> BoxFuture<'a, Result<Event, ApiError>>;

    /// Replace an event's details
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn update_event<'a>(
        &'a self,
        event_id: EventId,
        draft: &'a EventDraft,
    ) -> BoxFuture<'a, Result<Event, ApiError>>;

    /// Move an event to `status`
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn update_event_status(
        &self,
        event_id: EventId,
        status: EventStatus,
    ) -> BoxFuture<'_, Result<Event, ApiError>>;

    /// Item reservations made for one event
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_event_reservations(
        &self,
        event_id: EventId,
    ) -> BoxFuture<'_, Result<Vec<ItemReservation>, ApiError>>;
}

/// State of the event aggregate
#[derive(Clone, Debug, Default)]
pub struct EventState {
    /// Events by id
    pub events: BTreeMap<EventId, Event>,
    /// Whether a load is running
    pub loading: bool,
    /// Most recent failure, for display
    pub last_error: Option<BookingError>,
}

impl EventState {
    /// State holding `events`
    #[must_use]
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: events.into_iter().map(|event| (event.id, event)).collect(),
            ..Self::default()
        }
    }

    /// Events as a list, ordered by id
    #[must_use]
    pub fn event_list(&self) -> Vec<Event> {
        self.events.values().cloned().collect()
    }

    /// Whether an event other than `except` holds `date`
    #[must_use]
    pub fn is_occupied_by_other(&self, date: NaiveDate, except: Option<EventId>) -> bool {
        let others: Vec<Event> = self
            .events
            .values()
            .filter(|event| Some(event.id) != except)
            .cloned()
            .collect();
        is_date_occupied(date, &others)
    }
}

/// Actions for the event aggregate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EventAction {
    // Commands
    /// Fetch all events
    LoadEvents,

    /// A client asks for a date; always created as a quote
    RequestBooking {
        /// Requested event
        draft: EventDraft,
    },

    /// The owner registers an event
    CreateEvent {
        /// New event
        draft: EventDraft,
    },

    /// The owner edits an event's details; its status is kept
    UpdateEvent {
        /// Event to edit
        event_id: EventId,
        /// New details
        draft: EventDraft,
    },

    /// The owner moves an event along its lifecycle
    ChangeStatus {
        /// Event to change
        event_id: EventId,
        /// Target status
        status: EventStatus,
    },

    // Events
    /// Events arrived from the backend
    EventsLoaded {
        /// All events
        events: Vec<Event>,
    },

    /// The backend stored a created or edited event
    EventSaved {
        /// Stored record
        event: Event,
    },

    /// The backend changed an event's status
    EventStatusChanged {
        /// Updated record
        event: Event,
    },

    /// A command was rejected before reaching the backend
    ValidationFailed {
        /// Why
        error: BookingError,
    },

    /// The backend call failed
    OperationFailed {
        /// Why
        error: BookingError,
    },
}

/// Dependencies of the event aggregate
#[derive(Clone)]
pub struct EventEnvironment {
    /// Clock deciding what "today" is
    pub clock: Arc<dyn Clock>,
    /// The venue's UTC offset; its local midnight starts a new day
    pub utc_offset: FixedOffset,
    /// Backend the events live in
    pub backend: Arc<dyn EventBackend>,
}

impl EventEnvironment {
    /// Creates a new `EventEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        utc_offset: FixedOffset,
        backend: Arc<dyn EventBackend>,
    ) -> Self {
        Self {
            clock,
            utc_offset,
            backend,
        }
    }

    /// The venue's current calendar day
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.utc_offset)
    }
}

/// Reducer for the event aggregate
#[derive(Clone, Debug, Default)]
pub struct EventReducer;

impl EventReducer {
    /// Creates a new `EventReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_details(draft: &EventDraft) -> Result<(), BookingError> {
        if draft.title.trim().is_empty() {
            return Err(BookingError::validation("title", "Title is required."));
        }
        if let (Some(start), Some(end)) = (draft.start_time, draft.end_time) {
            if end <= start {
                return Err(BookingError::validation(
                    "endTime",
                    "End time must be after start time.",
                ));
            }
        }
        Ok(())
    }

    fn validate_booking_request(
        state: &EventState,
        draft: &EventDraft,
        today: NaiveDate,
    ) -> Result<(), BookingError> {
        Self::validate_details(draft)?;
        if draft.client_id.is_none() {
            return Err(BookingError::validation("clientId", "A client is required."));
        }
        if draft.event_date < today {
            return Err(BookingError::DateInPast {
                date: draft.event_date,
            });
        }
        if !is_date_available(draft.event_date, today, &state.event_list()) {
            return Err(BookingError::DateOccupied {
                date: draft.event_date,
            });
        }
        Ok(())
    }

    fn validate_create(state: &EventState, draft: &EventDraft) -> Result<(), BookingError> {
        Self::validate_details(draft)?;
        if draft.status.is_terminal() {
            return Err(BookingError::validation(
                "status",
                "New events must be quotes or confirmed.",
            ));
        }
        if draft.status.blocks_calendar() && state.is_occupied_by_other(draft.event_date, None) {
            return Err(BookingError::DateOccupied {
                date: draft.event_date,
            });
        }
        Ok(())
    }

    fn validate_update(
        state: &EventState,
        event_id: EventId,
        draft: &EventDraft,
    ) -> Result<(EventStatus, NaiveDate), BookingError> {
        let current = state
            .events
            .get(&event_id)
            .ok_or(BookingError::EventNotFound(event_id))?;
        Self::validate_details(draft)?;
        if current.status.blocks_calendar()
            && state.is_occupied_by_other(draft.event_date, Some(event_id))
        {
            return Err(BookingError::DateOccupied {
                date: draft.event_date,
            });
        }
        Ok((current.status, current.event_date))
    }

    fn validate_status_change(
        state: &EventState,
        event_id: EventId,
        status: EventStatus,
    ) -> Result<(), BookingError> {
        let event = state
            .events
            .get(&event_id)
            .ok_or(BookingError::EventNotFound(event_id))?;

        if !event.status.can_transition_to(status) {
            return Err(BookingError::InvalidTransition {
                entity: "event",
                from: event.status.to_string(),
                to: status.to_string(),
            });
        }
        if status == EventStatus::Confirmed
            && state.is_occupied_by_other(event.event_date, Some(event_id))
        {
            return Err(BookingError::DateOccupied {
                date: event.event_date,
            });
        }
        Ok(())
    }

    fn apply_event(state: &mut EventState, action: &EventAction) {
        match action {
            EventAction::EventsLoaded { events } => {
                state.events = events.iter().map(|event| (event.id, event.clone())).collect();
                state.loading = false;
                state.last_error = None;
            },
            EventAction::EventSaved { event } | EventAction::EventStatusChanged { event } => {
                state.events.insert(event.id, event.clone());
                state.last_error = None;
            },
            EventAction::ValidationFailed { error } | EventAction::OperationFailed { error } => {
                state.loading = false;
                state.last_error = Some(error.clone());
            },
            // Commands don't modify state
            EventAction::LoadEvents
            | EventAction::RequestBooking { .. }
            | EventAction::CreateEvent { .. }
            | EventAction::UpdateEvent { .. }
            | EventAction::ChangeStatus { .. } => {},
        }
    }

    fn reject(state: &mut EventState, error: BookingError) -> SmallVec<[Effect<EventAction>; 4]> {
        tracing::warn!(%error, "Event command rejected");
        Self::apply_event(state, &EventAction::ValidationFailed { error });
        SmallVec::new()
    }

    fn save(env: &EventEnvironment, event_id: Option<EventId>, draft: EventDraft) -> Effect<EventAction> {
        let backend = Arc::clone(&env.backend);
        Effect::future(async move {
            let saved = match event_id {
                Some(event_id) => backend.update_event(event_id, &draft).await,
                None => backend.create_event(&draft).await,
            };
            Some(match saved {
                Ok(event) => EventAction::EventSaved { event },
                Err(error) => EventAction::OperationFailed {
                    error: error.into(),
                },
            })
        })
    }

    /// Save a date change unless reservations still hold units on the old date.
    fn move_and_save(
        env: &EventEnvironment,
        event_id: EventId,
        draft: EventDraft,
    ) -> Effect<EventAction> {
        let backend = Arc::clone(&env.backend);
        Effect::future(async move {
            let active = match backend.fetch_event_reservations(event_id).await {
                Ok(reservations) => reservations
                    .iter()
                    .filter(|reservation| reservation.status.is_active())
                    .count(),
                Err(error) => {
                    return Some(EventAction::OperationFailed {
                        error: error.into(),
                    });
                },
            };
            if active > 0 {
                tracing::warn!(%event_id, active, "Date change rejected, items still reserved");
                return Some(EventAction::ValidationFailed {
                    error: BookingError::EventHasReservations { event_id, active },
                });
            }

            Some(match backend.update_event(event_id, &draft).await {
                Ok(event) => EventAction::EventSaved { event },
                Err(error) => EventAction::OperationFailed {
                    error: error.into(),
                },
            })
        })
    }
}

impl Reducer for EventReducer {
    type State = EventState;
    type Action = EventAction;
    type Environment = EventEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            EventAction::LoadEvents => {
                state.loading = true;
                let backend = Arc::clone(&env.backend);
                smallvec![Effect::future(async move {
                    Some(match backend.fetch_events().await {
                        Ok(events) => EventAction::EventsLoaded { events },
                        Err(error) => EventAction::OperationFailed {
                            error: error.into(),
                        },
                    })
                })]
            },

            EventAction::RequestBooking { mut draft } => {
                if let Err(error) = Self::validate_booking_request(state, &draft, env.today()) {
                    return Self::reject(state, error);
                }
                draft.status = EventStatus::Quote;
                tracing::info!(date = %draft.event_date, "Booking requested");
                smallvec![Self::save(env, None, draft)]
            },

            EventAction::CreateEvent { draft } => {
                if let Err(error) = Self::validate_create(state, &draft) {
                    return Self::reject(state, error);
                }
                smallvec![Self::save(env, None, draft)]
            },

            EventAction::UpdateEvent {
                event_id,
                mut draft,
            } => match Self::validate_update(state, event_id, &draft) {
                Ok((status, date)) if date == draft.event_date => {
                    draft.status = status;
                    smallvec![Self::save(env, Some(event_id), draft)]
                },
                Ok((status, _)) => {
                    draft.status = status;
                    smallvec![Self::move_and_save(env, event_id, draft)]
                },
                Err(error) => Self::reject(state, error),
            },

            EventAction::ChangeStatus { event_id, status } => {
                if let Err(error) = Self::validate_status_change(state, event_id, status) {
                    return Self::reject(state, error);
                }
                let backend = Arc::clone(&env.backend);
                smallvec![Effect::future(async move {
                    Some(match backend.update_event_status(event_id, status).await {
                        Ok(event) => EventAction::EventStatusChanged { event },
                        Err(error) => EventAction::OperationFailed {
                            error: error.into(),
                        },
                    })
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
