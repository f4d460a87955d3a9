//! Application wiring: configuration, session, backend client and stores.

use crate::aggregates::{
    ClientAction, ClientEnvironment, ClientReducer, ClientState, EventAction, EventEnvironment,
    EventReducer, EventState, NotificationAction, NotificationEnvironment, NotificationReducer,
    NotificationState, ReservationAction, ReservationEnvironment, ReservationReducer,
    ReservationState,
};
use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::session::{FileSessionStore, SessionContext, SessionError, SessionStore};
use crate::types::User;
use chrono::NaiveDate;
use std::sync::Arc;
use venue_core::environment::{Clock, SystemClock};
use venue_runtime::Store;

/// Store running the event reducer
pub type EventStore = Store<EventState, EventAction, EventEnvironment, EventReducer>;
/// Store running the reservation reducer
pub type ReservationStore =
    Store<ReservationState, ReservationAction, ReservationEnvironment, ReservationReducer>;
/// Store running the client reducer
pub type ClientStore = Store<ClientState, ClientAction, ClientEnvironment, ClientReducer>;
/// Store running the notification reducer
pub type NotificationStore =
    Store<NotificationState, NotificationAction, NotificationEnvironment, NotificationReducer>;

/// Everything a front end needs, built once from [`Config`]
#[derive(Clone)]
pub struct VenueApp {
    config: Config,
    clock: Arc<dyn Clock>,
    session: Arc<SessionContext>,
    api: Arc<ApiClient>,
}

impl VenueApp {
    /// Build the app with the system clock and the file session store.
    ///
    /// # Errors
    ///
    /// Returns error if the backend client cannot be built.
    pub fn from_config(config: Config) -> Result<Self, ApiError> {
        let store = Arc::new(FileSessionStore::new(config.session.file.clone()));
        Self::with_parts(config, Arc::new(SystemClock), store)
    }

    /// Build the app around an explicit clock and session store.
    ///
    /// # Errors
    ///
    /// Returns error if the backend client cannot be built.
    pub fn with_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        session_store: Arc<dyn SessionStore>,
    ) -> Result<Self, ApiError> {
        let session = Arc::new(SessionContext::new(session_store, Arc::clone(&clock)));
        let api = Arc::new(ApiClient::new(&config.api, Arc::clone(&session))?);
        Ok(Self {
            config,
            clock,
            session,
            api,
        })
    }

    /// Restore the persisted session, if still valid
    ///
    /// # Errors
    ///
    /// Returns error if the session storage cannot be read.
    pub async fn init_session(&self) -> Result<Option<User>, SessionError> {
        self.session.init().await
    }

    /// Loaded configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Active session
    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Backend client
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The venue's current calendar day
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.clock.today(self.config.venue.utc_offset())
    }

    /// A fresh event store
    #[must_use]
    pub fn event_store(&self) -> EventStore {
        let env = EventEnvironment::new(
            Arc::clone(&self.clock),
            self.config.venue.utc_offset(),
            self.api.clone(),
        );
        Store::new(EventState::default(), EventReducer::new(), env)
    }

    /// A fresh reservation store
    #[must_use]
    pub fn reservation_store(&self) -> ReservationStore {
        let env = ReservationEnvironment::new(self.api.clone());
        Store::new(ReservationState::default(), ReservationReducer::new(), env)
    }

    /// A fresh client store
    #[must_use]
    pub fn client_store(&self) -> ClientStore {
        let env = ClientEnvironment::new(self.api.clone());
        Store::new(ClientState::default(), ClientReducer::new(), env)
    }

    /// A fresh notification store
    #[must_use]
    pub fn notification_store(&self) -> NotificationStore {
        let env = NotificationEnvironment::new(self.api.clone());
        Store::new(NotificationState::default(), NotificationReducer::new(), env)
    }
}
