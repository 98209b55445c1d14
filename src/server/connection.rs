// Connection module
// Admits accepted TCP connections and runs each one in its own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

use crate::config::AppState;
use crate::handler;
use crate::logger::{self, AccessLogEntry};

/// Holds one slot of the active connection counter until dropped
struct ActiveConnection(Arc<AtomicUsize>);

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, checking limits, and spawn its handler.
///
/// Returns `None` when the connection was rejected.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) -> Option<JoinHandle<()>> {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);
    let slot = ActiveConnection(Arc::clone(conn_counter));

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            logger::log_connection_rejected(&peer_addr, prev_count, max_conn);
            drop(slot);
            drop(stream);
            return None;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    let state = Arc::clone(state);
    Some(tokio::spawn(async move {
        let _slot = slot;
        serve_connection(stream, peer_addr, &state).await;
    }))
}

/// Run the handler and write the access log line
async fn serve_connection(stream: TcpStream, peer_addr: SocketAddr, state: &AppState) {
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string());

    match handler::handle_connection(stream, &state.handler).await {
        Ok(summary) => {
            entry.status = Some(summary.status.code());
            entry.body_bytes = summary.body_bytes;
            if let Some(request) = summary.request {
                entry.request_line = Some(request.request_line);
                entry.path = Some(request.requested_path);
            }
        }
        Err(e) => logger::log_connection_error(&e),
    }

    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    if state.access_log_enabled() {
        logger::log_access(&entry, state.access_log_format());
    }
}
