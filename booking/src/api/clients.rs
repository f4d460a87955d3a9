//! Client endpoints.

use super::{ApiClient, ApiError};
use crate::aggregates::ClientBackend;
use crate::types::{Client, ClientDraft, ClientId};
use futures::future::BoxFuture;

impl ApiClient {
    /// All clients
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn clients(&self) -> Result<Vec<Client>, ApiError> {
        self.get("clients").await
    }

    /// Create a client
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_client(&self, draft: &ClientDraft) -> Result<Client, ApiError> {
        self.post("clients", draft).await
    }

    /// Replace a client's details
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn update_client(
        &self,
        client_id: ClientId,
        draft: &ClientDraft,
    ) -> Result<Client, ApiError> {
        self.put(&format!("clients/{client_id}"), draft).await
    }

    /// Delete a client.
    ///
    /// Issues the call unconditionally; go through the client reducer to have
    /// clients with events refused first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn delete_client(&self, client_id: ClientId) -> Result<(), ApiError> {
        self.delete(&format!("clients/{client_id}")).await
    }
}

impl ClientBackend for ApiClient {
    fn fetch_clients(&self) -> BoxFuture<'_, Result<Vec<Client>, ApiError>> {
        Box::pin(self.clients())
    }

    fn create_client<'a>(&'a self, draft: &'a ClientDraft) -> BoxFuture<'a, Result<Client, ApiError>> {
        Box::pin(ApiClient::create_client(self, draft))
    }

    fn update_client<'a>(
        &'a self,
        client_id: ClientId,
        draft: &'a ClientDraft,
    ) -> BoxFuture<'a, Result<Client, ApiError>> {
        Box::pin(ApiClient::update_client(self, client_id, draft))
    }

    fn delete_client(&self, client_id: ClientId) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(ApiClient::delete_client(self, client_id))
    }
}
