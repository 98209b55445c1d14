//! HTTP response header module
//!
//! Builds the fixed-order response head: status line, `Date`, `Server`,
//! `Connection: close`, `Content-Type`, then the blank line. No `Content-Length`
//! is sent; the body is streamed until the connection closes.

use chrono::{DateTime, Utc};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Outcome of a request, shared by the header and the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    NotFound,
}

impl ResponseStatus {
    pub const fn from_found(found: bool) -> Self {
        if found {
            Self::Ok
        } else {
            Self::NotFound
        }
    }

    pub const fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NotFound => 404,
        }
    }

    pub const fn status_line(self) -> &'static str {
        match self {
            Self::Ok => "HTTP/1.1 200 OK",
            Self::NotFound => "HTTP/1.1 404 Not Found",
        }
    }
}

/// Header line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Format the `Date` header value, e.g. `Oct 19, 2026 3:04:05 PM GMT`
pub fn format_header_date(now: DateTime<Utc>) -> String {
    now.format("%b %-d, %Y %-I:%M:%S %p GMT").to_string()
}

/// A response head ready to be serialized
#[derive(Debug, Clone)]
pub struct ResponseHeader<'a> {
    pub status: ResponseStatus,
    pub date: DateTime<Utc>,
    pub server: &'a str,
    pub content_type: &'a str,
}

impl<'a> ResponseHeader<'a> {
    pub fn new(status: ResponseStatus, server: &'a str, content_type: &'a str) -> Self {
        Self {
            status,
            date: Utc::now(),
            server,
            content_type,
        }
    }

    pub fn to_bytes(&self, ending: LineEnding) -> Vec<u8> {
        let eol = ending.as_str();
        format!(
            "{status}{eol}Date: {date}{eol}Server: {server}{eol}Connection: close{eol}Content-Type: {content_type}{eol}{eol}",
            status = self.status.status_line(),
            date = format_header_date(self.date),
            server = self.server,
            content_type = self.content_type,
        )
        .into_bytes()
    }

    /// Write the head to `out`, returning the number of bytes written
    pub async fn write_to<W>(&self, out: &mut W, ending: LineEnding) -> io::Result<usize>
    where
        W: AsyncWrite + Unpin,
    {
        let bytes = self.to_bytes(ending);
        out.write_all(&bytes).await?;
        Ok(bytes.len())
    }
}
