//! A minimal single-request HTTP responder.
//!
//! Every accepted connection is answered once: the requested file is streamed back
//! with its template tokens substituted, or a fixed "File not found" page is sent,
//! and the connection is closed.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
