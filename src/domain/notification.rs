//! Events pushed to WebSocket subscribers.
//!
//! Every event is serialized as a single JSON text frame of the shape
//! `{"event": "<name>", "data": {...}}`.

use serde::Serialize;

use super::{PublicUser, User};

/// Server → client notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum NotificationEvent {
    /// A user record was mutated.
    #[serde(rename = "userUpdated")]
    UserUpdated(PublicUser),
}

impl NotificationEvent {
    /// Builds a `userUpdated` event from a full record, applying the
    /// [`PublicUser`] whitelist.
    #[must_use]
    pub fn user_updated(user: &User) -> Self {
        Self::UserUpdated(PublicUser::from(user))
    }

    /// Returns the wire name of the event.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::UserUpdated(_) => "userUpdated",
        }
    }
}
