//! Client aggregate.
//!
//! A client with events cannot be deleted; the check runs before any call
//! reaches the backend.

use crate::api::ApiError;
use crate::error::BookingError;
use crate::types::{Client, ClientDraft, ClientId};
use futures::future::BoxFuture;
use std::collections::BTreeMap;
use std::sync::Arc;
use venue_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Backend operations the client aggregate needs.
///
/// Returns `BoxFuture` instead of async fn to be dyn-compatible.
pub trait ClientBackend: Send + Sync {
    /// All clients
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_clients(&self) -> BoxFuture<'_, Result<Vec<Client>, ApiError>>;

    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn create_client<'a>(&'a self, draft: &'a ClientDraft)
        -> BoxFuture<'a, Result<Client, ApiError>>;

    /// Replace a client's details
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn update_client<'a>(
        &'a self,
        client_id: ClientId,
        draft: &'a ClientDraft,
    ) -> BoxFuture<'a, Result<Client, ApiError>>;

    /// Delete a client
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn delete_client(&self, client_id: ClientId) -> BoxFuture<'_, Result<(), ApiError>>;
}

/// State of the client aggregate
#[derive(Clone, Debug, Default)]
pub struct ClientState {
    /// Clients by id
    pub clients: BTreeMap<ClientId, Client>,
    /// Most recent failure, for display
    pub last_error: Option<BookingError>,
}

impl ClientState {
    /// State holding `clients`
    #[must_use]
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: clients.into_iter().map(|client| (client.id, client)).collect(),
            last_error: None,
        }
    }
}

/// Actions for the client aggregate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientAction {
    // Commands
    /// Fetch all clients
    LoadClients,
    /// Register a client
    CreateClient {
        /// New client
        draft: ClientDraft,
    },
    /// Edit a client
    UpdateClient {
        /// Client to edit
        client_id: ClientId,
        /// New details
        draft: ClientDraft,
    },
    /// Delete a client without events
    DeleteClient {
        /// Client to delete
        client_id: ClientId,
    },

    // Events
    /// Clients arrived from the backend
    ClientsLoaded {
        /// All clients
        clients: Vec<Client>,
    },
    /// The backend stored a created or edited client
    ClientSaved {
        /// Stored record
        client: Client,
    },
    /// The backend deleted a client
    ClientDeleted {
        /// Deleted client
        client_id: ClientId,
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

/// Dependencies of the client aggregate
#[derive(Clone)]
pub struct ClientEnvironment {
    /// Backend the clients live in
    pub backend: Arc<dyn ClientBackend>,
}

impl ClientEnvironment {
    /// Creates a new `ClientEnvironment`
    #[must_use]
    pub fn new(backend: Arc<dyn ClientBackend>) -> Self {
        Self { backend }
    }
}

/// Reducer for the client aggregate
#[derive(Clone, Debug, Default)]
pub struct ClientReducer;

impl ClientReducer {
    /// Creates a new `ClientReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_draft(draft: &ClientDraft) -> Result<(), BookingError> {
        if draft.name.trim().is_empty() {
            return Err(BookingError::validation("name", "Name is required."));
        }
        let email = draft.email.trim();
        if email.is_empty() {
            return Err(BookingError::validation("email", "E-mail is required."));
        }
        if !email.contains('@') {
            return Err(BookingError::validation("email", "E-mail is not valid."));
        }
        Ok(())
    }

    fn validate_delete(state: &ClientState, client_id: ClientId) -> Result<(), BookingError> {
        let client = state
            .clients
            .get(&client_id)
            .ok_or(BookingError::ClientNotFound(client_id))?;
        if client.events_count > 0 {
            return Err(BookingError::ClientHasEvents {
                client_id,
                events_count: client.events_count,
            });
        }
        Ok(())
    }

    fn apply_event(state: &mut ClientState, action: &ClientAction) {
        match action {
            ClientAction::ClientsLoaded { clients } => {
                state.clients = clients
                    .iter()
                    .map(|client| (client.id, client.clone()))
                    .collect();
                state.last_error = None;
            },
            ClientAction::ClientSaved { client } => {
                state.clients.insert(client.id, client.clone());
                state.last_error = None;
            },
            ClientAction::ClientDeleted { client_id } => {
                state.clients.remove(client_id);
                state.last_error = None;
            },
            ClientAction::ValidationFailed { error } | ClientAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands don't modify state
            ClientAction::LoadClients
            | ClientAction::CreateClient { .. }
            | ClientAction::UpdateClient { .. }
            | ClientAction::DeleteClient { .. } => {},
        }
    }

    fn reject(state: &mut ClientState, error: BookingError) -> SmallVec<[Effect<ClientAction>; 4]> {
        tracing::warn!(%error, "Client command rejected");
        Self::apply_event(state, &ClientAction::ValidationFailed { error });
        SmallVec::new()
    }
}

fn failed(error: ApiError) -> ClientAction {
    ClientAction::OperationFailed {
        error: error.into(),
    }
}

impl Reducer for ClientReducer {
    type State = ClientState;
    type Action = ClientAction;
    type Environment = ClientEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let backend = Arc::clone(&env.backend);

        match action {
            // ========== Commands ==========
            ClientAction::LoadClients => smallvec![Effect::future(async move {
                Some(match backend.fetch_clients().await {
                    Ok(clients) => ClientAction::ClientsLoaded { clients },
                    Err(error) => failed(error),
                })
            })],

            ClientAction::CreateClient { draft } => {
                if let Err(error) = Self::validate_draft(&draft) {
                    return Self::reject(state, error);
                }
                smallvec![Effect::future(async move {
                    Some(match backend.create_client(&draft).await {
                        Ok(client) => ClientAction::ClientSaved { client },
                        Err(error) => failed(error),
                    })
                })]
            },

            ClientAction::UpdateClient { client_id, draft } => {
                if !state.clients.contains_key(&client_id) {
                    return Self::reject(state, BookingError::ClientNotFound(client_id));
                }
                if let Err(error) = Self::validate_draft(&draft) {
                    return Self::reject(state, error);
                }
                smallvec![Effect::future(async move {
                    Some(match backend.update_client(client_id, &draft).await {
                        Ok(client) => ClientAction::ClientSaved { client },
                        Err(error) => failed(error),
                    })
                })]
            },

            ClientAction::DeleteClient { client_id } => {
                if let Err(error) = Self::validate_delete(state, client_id) {
                    return Self::reject(state, error);
                }
                smallvec![Effect::future(async move {
                    Some(match backend.delete_client(client_id).await {
                        Ok(()) => ClientAction::ClientDeleted { client_id },
                        Err(error) => failed(error),
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
