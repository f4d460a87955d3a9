//! Notification aggregate: the signed-in user's inbox.

use crate::api::ApiError;
use crate::error::BookingError;
use crate::types::{Notification, NotificationId};
use futures::future::BoxFuture;
use std::sync::Arc;
use venue_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Backend operations the notification aggregate needs.
///
/// Returns `BoxFuture` instead of async fn to be dyn-compatible.
pub trait NotificationBackend: Send + Sync {
    /// Notifications of the signed-in user
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn fetch_notifications(&self) -> BoxFuture<'_, Result<Vec<Notification>, ApiError>>;

    /// Mark one notification read
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn mark_read(&self, notification_id: NotificationId) -> BoxFuture<'_, Result<(), ApiError>>;

    /// Mark every notification read
    ///
    /// # Errors
    ///
    /// Returns error if the backend call fails.
    fn mark_all_read(&self) -> BoxFuture<'_, Result<(), ApiError>>;
}

/// State of the notification aggregate
#[derive(Clone, Debug, Default)]
pub struct NotificationState {
    /// Notifications, newest first
    pub notifications: Vec<Notification>,
    /// Most recent failure, for display
    pub last_error: Option<BookingError>,
}

impl NotificationState {
    /// How many notifications are unread
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    fn find(&self, notification_id: NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == notification_id)
    }
}

/// Actions for the notification aggregate
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationAction {
    // Commands
    /// Fetch the inbox
    Load,
    /// Mark one notification read
    MarkRead {
        /// Notification to mark
        notification_id: NotificationId,
    },
    /// Mark every notification read
    MarkAllRead,

    // Events
    /// Inbox arrived from the backend
    Loaded {
        /// Notifications in any order
        notifications: Vec<Notification>,
    },
    /// The backend marked one notification read
    MarkedRead {
        /// Marked notification
        notification_id: NotificationId,
    },
    /// The backend marked everything read
    AllMarkedRead,
    /// The backend call failed
    OperationFailed {
        /// Why
        error: BookingError,
    },
}

/// Dependencies of the notification aggregate
#[derive(Clone)]
pub struct NotificationEnvironment {
    /// Backend the notifications live in
    pub backend: Arc<dyn NotificationBackend>,
}

impl NotificationEnvironment {
    /// Creates a new `NotificationEnvironment`
    #[must_use]
    pub fn new(backend: Arc<dyn NotificationBackend>) -> Self {
        Self { backend }
    }
}

/// Reducer for the notification aggregate
#[derive(Clone, Debug, Default)]
pub struct NotificationReducer;

impl NotificationReducer {
    /// Creates a new `NotificationReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn apply_event(state: &mut NotificationState, action: &NotificationAction) {
        match action {
            NotificationAction::Loaded { notifications } => {
                let mut notifications = notifications.clone();
                notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                state.notifications = notifications;
                state.last_error = None;
            },
            NotificationAction::MarkedRead { notification_id } => {
                if let Some(n) = state
                    .notifications
                    .iter_mut()
                    .find(|n| n.id == *notification_id)
                {
                    n.read = true;
                }
            },
            NotificationAction::AllMarkedRead => {
                for n in &mut state.notifications {
                    n.read = true;
                }
            },
            NotificationAction::OperationFailed { error } => {
                state.last_error = Some(error.clone());
            },
            // Commands don't modify state
            NotificationAction::Load
            | NotificationAction::MarkRead { .. }
            | NotificationAction::MarkAllRead => {},
        }
    }
}

fn failed(error: ApiError) -> NotificationAction {
    NotificationAction::OperationFailed {
        error: error.into(),
    }
}

impl Reducer for NotificationReducer {
    type State = NotificationState;
    type Action = NotificationAction;
    type Environment = NotificationEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let backend = Arc::clone(&env.backend);

        match action {
            NotificationAction::Load => smallvec![Effect::future(async move {
                Some(match backend.fetch_notifications().await {
                    Ok(notifications) => NotificationAction::Loaded { notifications },
                    Err(error) => failed(error),
                })
            })],

            NotificationAction::MarkRead { notification_id } => {
                // Unknown or already read: nothing to tell the backend.
                if state.find(notification_id).is_none_or(|n| n.read) {
                    return SmallVec::new();
                }
                smallvec![Effect::future(async move {
                    Some(match backend.mark_read(notification_id).await {
                        Ok(()) => NotificationAction::MarkedRead { notification_id },
                        Err(error) => failed(error),
                    })
                })]
            },

            NotificationAction::MarkAllRead => {
                if state.unread_count() == 0 {
                    return SmallVec::new();
                }
                smallvec![Effect::future(async move {
                    Some(match backend.mark_all_read().await {
                        Ok(()) => NotificationAction::AllMarkedRead,
                        Err(error) => failed(error),
                    })
                })]
            },

            event => {
                Self::apply_event(state, &event);
                smallvec![Effect::None]
            },
        }
    }
}
