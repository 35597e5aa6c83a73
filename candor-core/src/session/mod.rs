//! Per-connection interview session
//!
//! One `InterviewSession` is bound to each live connection by the gateway
//! and discarded on close. Outbound traffic flows through an unbounded
//! channel of `SessionEvent`s; the gateway owns the transport side.

mod event;
mod machine;

pub use event::SessionEvent;
pub use machine::{InterviewSession, SessionPhase};
