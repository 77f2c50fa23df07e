//! Post resource.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Storage key.
    pub id: i64,
    /// Public identifier.
    pub uuid: Uuid,
    /// Body text.
    pub text: String,
    /// Storage key of the authoring user.
    pub author_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the last mutation.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Body text.
    pub text: String,
    /// Storage key of the authoring user.
    pub author_id: i64,
}

/// Public shape of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicPost {
    /// Storage key.
    pub id: i64,
    /// Public identifier.
    pub uuid: Uuid,
    /// Body text.
    pub text: String,
    /// Storage key of the author.
    pub author_id: i64,
}

impl From<Post> for PublicPost {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            uuid: post.uuid,
            text: post.text,
            author_id: post.author_id,
        }
    }
}
