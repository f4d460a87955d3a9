//! Notification endpoints.

use super::{ApiClient, ApiError};
use crate::aggregates::NotificationBackend;
use crate::types::{NewNotification, Notification, NotificationId};
use futures::future::BoxFuture;

impl ApiClient {
    /// Notifications of the signed-in user
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get("notifications").await
    }

    /// Raise a notification
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn create_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<Notification, ApiError> {
        self.post("notifications", notification).await
    }

    /// Mark one notification read
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn mark_notification_read(
        &self,
        notification_id: NotificationId,
    ) -> Result<(), ApiError> {
        self.patch_empty(&format!("notifications/{notification_id}/read"))
            .await
    }

    /// Mark every notification read
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn mark_all_notifications_read(&self) -> Result<(), ApiError> {
        self.patch_empty("notifications/read-all").await
    }
}

impl NotificationBackend for ApiClient {
    fn fetch_notifications(&self) -> BoxFuture<'_, Result<Vec<Notification>, ApiError>> {
        Box::pin(self.notifications())
    }

    fn mark_read(&self, notification_id: NotificationId) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(self.mark_notification_read(notification_id))
    }

    fn mark_all_read(&self) -> BoxFuture<'_, Result<(), ApiError>> {
        Box::pin(self.mark_all_notifications_read())
    }
}
