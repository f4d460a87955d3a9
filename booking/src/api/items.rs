//! Inventory item and reservation endpoints.

use super::events::StatusBody;
use super::{ApiClient, ApiError};
use crate::aggregates::InventoryBackend;
use crate::types::{
    Event, EventId, Item, ItemDraft, ItemId, ItemReservation, NewReservation, ReservationId,
    ReservationStatus,
};
use futures::future::BoxFuture;

impl ApiClient {
    /// All items
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn items(&self) -> Result<Vec<Item>, ApiError> {
        self.get("items").await
    }

    /// Create an item
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_item(&self, draft: &ItemDraft) -> Result<Item, ApiError> {
        self.post("items", draft).await
    }

    /// Replace an item's details
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_item(&self, item_id: ItemId, draft: &ItemDraft) -> Result<Item, ApiError> {
        self.put(&format!("items/{item_id}"), draft).await
    }

    /// All reservations
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn reservations(&self) -> Result<Vec<ItemReservation>, ApiError> {
        self.get("items/reservations").await
    }

    /// Reservations of one event
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn reservations_by_event(
        &self,
        event_id: EventId,
    ) -> Result<Vec<ItemReservation>, ApiError> {
        self.get(&format!("items/reservations/event/{event_id}")).await
    }

    /// Create a reservation as given; no stock check is made here.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_reservation(
        &self,
        request: &NewReservation,
    ) -> Result<ItemReservation, ApiError> {
        self.post("items/reservations", request).await
    }

    /// Move a reservation to `status`
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_reservation_status(
        &self,
        reservation_id: ReservationId,
        status: ReservationStatus,
    ) -> Result<ItemReservation, ApiError> {
        self.patch(
            &format!("items/reservations/{reservation_id}/status"),
            &StatusBody { status },
        )
        .await
    }
}

impl InventoryBackend for ApiClient {
    fn fetch_items(&self) -> BoxFuture<'_, Result<Vec<Item>, ApiError>> {
        Box::pin(self.items())
    }

    fn fetch_events(&self) -> BoxFuture<'_, Result<Vec<Event>, ApiError>> {
        Box::pin(self.events())
    }

    fn fetch_reservations(&self) -> BoxFuture<'_, Result<Vec<ItemReservation>, ApiError>> {
        Box::pin(self.reservations())
    }

    fn create_reservation<'a>(
        &'a self,
        request: &'a NewReservation,
    ) -> BoxFuture<'a, Result<ItemReservation, ApiError>> {
        Box::pin(ApiClient::create_reservation(self, request))
    }

    fn update_reservation_status(
        &self,
        reservation_id: ReservationId,
        status: ReservationStatus,
    ) -> BoxFuture<'_, Result<ItemReservation, ApiError>> {
        Box::pin(ApiClient::update_reservation_status(self, reservation_id, status))
    }
}
