//! # userhub
//!
//! REST API for users and posts with JWT auth, avatar uploads to object
//! storage, and a WebSocket channel that pushes `userUpdated` events to
//! every connected client.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)          ── AuthUser / ValidatedJson extractors
//!     ├── WS Handler (ws/)              ── /ws/conn
//!     │
//!     ├── UserService ──────────────┐
//!     ├── AuthService, PostService  │ emit_user_update
//!     │                             ▼
//!     │                   ConnectionRegistry (ws/) ── fan-out to open sockets
//!     │
//!     ├── Repositories (persistence/) ── PostgreSQL | in-memory
//!     └── ObjectStorage (storage/)    ── S3-compatible bucket
//! ```
//!
//! Collaborators are wired explicitly in `main` (see [`app::build_app`]).

pub mod api;
pub mod app;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod storage;
pub mod ws;
