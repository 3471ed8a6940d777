//! In-memory conversation sessions for the concierge.
//!
//! Sessions hold message history and key/value state and expire after a
//! fixed idle timeout. Nothing is persisted across restarts.

pub mod manager;
pub mod session;

pub use manager::{SessionManager, SessionStats};
pub use session::{Session, SessionMessage, SessionMetadata, SessionSummary};
