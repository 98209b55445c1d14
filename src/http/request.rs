//! Request head reading
//!
//! Reads request lines until the blank line that ends the head. The first line
//! carrying the `GET` marker names the target; every other line is read and ignored.

use std::fmt;
use std::io;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use super::path::{strip_leading_separator, PathResolver};
use crate::logger;

/// Marker that identifies the request line
pub const GET_MARKER: &str = "GET";

/// The parsed request target of one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Request line as received, without terminator
    pub request_line: String,
    /// Raw target token, possibly empty
    pub requested_path: String,
    /// Target with one leading separator stripped
    pub resolved_path: String,
    /// Location of `resolved_path` under the served root; canonical when the
    /// resolver confines requests to the root
    pub location: PathBuf,
    pub found: bool,
}

impl Request {
    /// Resolve a raw target against `resolver`
    pub async fn resolve(request_line: &str, requested_path: &str, resolver: &PathResolver) -> Self {
        let resolved_path = strip_leading_separator(requested_path).to_string();
        let joined = resolver.location(&resolved_path);
        let (location, found) = match resolver.servable(&joined).await {
            Some(path) => (path, true),
            None => (joined, false),
        };
        logger::log_resolved_path(requested_path, &resolved_path, found);

        Self {
            request_line: request_line.to_string(),
            requested_path: requested_path.to_string(),
            resolved_path,
            location,
            found,
        }
    }
}

/// Failure while reading the request head
#[derive(Debug)]
pub enum RequestError {
    Io(io::Error),
    /// A `GET` line without a target token
    MalformedRequestLine(String),
    /// The head exceeded the byte limit
    TooLarge(u64),
    /// The client did not finish the head in time
    Timeout(std::time::Duration),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "read error: {e}"),
            Self::MalformedRequestLine(line) => write!(f, "malformed request line: ({line})"),
            Self::TooLarge(limit) => write!(f, "request head exceeds {limit} bytes"),
            Self::Timeout(d) => write!(f, "request not received within {}s", d.as_secs()),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RequestError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Reads one request head from a buffered stream
#[derive(Debug, Clone)]
pub struct RequestReader {
    strict_method: bool,
    max_request_bytes: u64,
}

impl RequestReader {
    pub const fn new(max_request_bytes: u64) -> Self {
        Self {
            strict_method: false,
            max_request_bytes,
        }
    }

    /// Require `GET` as the first token rather than anywhere in the line
    #[must_use]
    pub const fn strict_method(mut self, strict: bool) -> Self {
        self.strict_method = strict;
        self
    }

    /// Whether `line` is treated as the request line
    pub fn is_request_line(&self, line: &str) -> bool {
        if self.strict_method {
            line.split_whitespace().next() == Some(GET_MARKER)
        } else {
            line.contains(GET_MARKER)
        }
    }

    /// Read lines until the blank line (or end of stream)
    ///
    /// Returns `Ok(None)` when no request line arrived before the head ended.
    pub async fn read<R>(
        &self,
        reader: &mut R,
        resolver: &PathResolver,
    ) -> Result<Option<Request>, RequestError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut limited = reader.take(self.max_request_bytes);
        let mut request = None;
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let n = limited.read_until(b'\n', &mut buf).await?;
            if n == 0 {
                if limited.limit() == 0 {
                    return Err(RequestError::TooLarge(self.max_request_bytes));
                }
                // peer closed before the blank line
                break;
            }
            if !buf.ends_with(b"\n") && limited.limit() == 0 {
                return Err(RequestError::TooLarge(self.max_request_bytes));
            }

            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\r', '\n']);
            logger::log_request_line(line);

            if request.is_none() && self.is_request_line(line) {
                let target = line
                    .split_whitespace()
                    .nth(1)
                    .ok_or_else(|| RequestError::MalformedRequestLine(line.to_string()))?;
                request = Some(Request::resolve(line, target, resolver).await);
            }

            if line.is_empty() {
                break;
            }
        }

        Ok(request)
    }
}
