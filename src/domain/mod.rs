//! Domain layer: users, posts, roles, and the notification event.
//!
//! These types are storage-agnostic. Private fields live on [`User`];
//! everything that leaves the process is projected through
//! [`PublicUser`] or [`PublicPost`] first.

pub mod notification;
pub mod post;
pub mod user;

pub use notification::NotificationEvent;
pub use post::{NewPost, Post, PublicPost};
pub use user::{NewUser, PublicUser, Role, User, UserChanges};
