//! Data Transfer Objects for REST request/response serialization.
//!
//! Response bodies reuse the domain projections ([`crate::domain::PublicUser`],
//! [`crate::domain::PublicPost`]); only request shapes and composite
//! responses live here.

pub mod auth_dto;
pub mod post_dto;
pub mod user_dto;

pub use auth_dto::*;
pub use post_dto::*;
pub use user_dto::*;
