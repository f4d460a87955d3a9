//! Event endpoints.

use super::{ApiClient, ApiError};
use crate::aggregates::EventBackend;
use crate::types::{ClientId, Event, EventDraft, EventId, EventStatus, ItemReservation};
use futures::future::BoxFuture;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct StatusBody<S> {
    pub(crate) status: S,
}

impl ApiClient {
    /// All events
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn events(&self) -> Result<Vec<Event>, ApiError> {
        self.get("events").await
    }

    /// Events of one client
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn events_by_client(&self, client_id: ClientId) -> Result<Vec<Event>, ApiError> {
        self.get(&format!("events/client/{client_id}")).await
    }

    /// One event
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for an unknown id.
    pub async fn event(&self, event_id: EventId) -> Result<Event, ApiError> {
        self.get(&format!("events/{event_id}")).await
    }

    /// Create an event
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<Event, ApiError> {
        self.post("events", draft).await
    }

    /// Replace an event's details
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_event(&self, event_id: EventId, draft: &EventDraft) -> Result<Event, ApiError> {
        self.put(&format!("events/{event_id}"), draft).await
    }

    /// Move an event to `status`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_event_status(
        &self,
        event_id: EventId,
        status: EventStatus,
    ) -> Result<Event, ApiError> {
        self.patch(&format!("events/{event_id}/status"), &StatusBody { status })
            .await
    }
}

impl EventBackend for ApiClient {
    fn fetch_events(&self) -> BoxFuture<'_, Result<Vec<Event>, ApiError>> {
        Box::pin(self.events())
    }

    fn create_event<'a>(&'a self, draft: &'a EventDraft) -> BoxFuture<'a, Result<Event, ApiError>> {
        Box::pin(ApiClient::create_event(self, draft))
    }

    fn update_event<'a>(
        &'a self,
        event_id: EventId,
        draft: &'a EventDraft,
    ) -> BoxFuture<'a, Result<Event, ApiError>> {
        Box::pin(ApiClient::update_event(self, event_id, draft))
    }

    fn update_event_status(
        &self,
        event_id: EventId,
        status: EventStatus,
    ) -> BoxFuture<'_, Result<Event, ApiError>> {
        Box::pin(ApiClient::update_event_status(self, event_id, status))
    }

    fn fetch_event_reservations(
        &self,
        event_id: EventId,
    ) -> BoxFuture<'_, Result<Vec<ItemReservation>, ApiError>> {
        Box::pin(self.reservations_by_event(event_id))
    }
}
