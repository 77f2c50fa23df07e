//! Authentication primitives: tokens, password hashing, permissions.

pub mod jwt;
pub mod password;
pub mod permissions;

pub use jwt::{Claims, IssuedToken, JwtService};
pub use password::PasswordHasher;
pub use permissions::{Permission, grants_all, permissions_for};
