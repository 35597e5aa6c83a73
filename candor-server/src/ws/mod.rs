//! WebSocket gateway

mod connection;
pub mod protocol;

pub use connection::ws_handler;
pub use protocol::{ClientMessage, ServerMessage, session_event_to_message};
