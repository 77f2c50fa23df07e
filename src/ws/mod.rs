//! WebSocket layer: connection registry, broadcaster, and socket handling.
//!
//! Clients connect to `/ws/conn` and receive `userUpdated` events whenever
//! a user record changes. The channel is one-way; anything the client
//! sends is logged and dropped.

pub mod connection;
pub mod connection_id;
pub mod handler;
pub mod registry;
pub mod transport;

pub use connection_id::ConnectionId;
pub use registry::{Connection, ConnectionRegistry};
pub use transport::{ChannelTransport, CloseObserver, SendError, Transport, TransportState};
