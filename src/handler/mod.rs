//! Connection handler module
//!
//! One handler per accepted connection: it owns the stream, answers a single
//! request and closes. Handlers share nothing mutable.

pub mod context;
pub mod worker;

// Re-export main entry point
pub use context::HandlerContext;
pub use worker::{handle_connection, ConnectionSummary, HandlerError};
