//! Per-connection worker
//!
//! Runs exactly one request/response cycle on a duplex stream:
//! read the request head, pick the status, write the header, write the body,
//! flush and close. Request failures degrade to a 404; response failures are
//! fatal for the connection only.

use std::fmt;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::timeout;

use super::context::HandlerContext;
use crate::http::{mime, ContentRenderer, Request, RequestError, ResponseHeader, ResponseStatus};
use crate::logger;

/// What a finished connection produced
#[derive(Debug, Clone)]
pub struct ConnectionSummary {
    pub status: ResponseStatus,
    /// The parsed request, `None` when no request line arrived or reading failed
    pub request: Option<Request>,
    pub header_bytes: usize,
    pub body_bytes: u64,
}

/// Failure while writing the response
#[derive(Debug)]
pub enum HandlerError {
    /// Writing the header failed; nothing usable reached the client
    Header(io::Error),
    /// The header was committed but the body could not be produced or written
    Body {
        status: ResponseStatus,
        source: io::Error,
    },
    /// The response was not written within the deadline
    Timeout(Duration),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header(e) => write!(f, "failed to write response header: {e}"),
            Self::Body { status, source } => {
                write!(f, "failed to write {} response body: {source}", status.code())
            }
            Self::Timeout(d) => write!(f, "response not written within {}s", d.as_secs()),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Header(e) | Self::Body { source: e, .. } => Some(e),
            Self::Timeout(_) => None,
        }
    }
}

/// Serve one request on `stream`, then close it
///
/// The stream is dropped (and so closed) exactly once, on success and on error.
pub async fn handle_connection<S>(
    stream: S,
    ctx: &HandlerContext,
) -> Result<ConnectionSummary, HandlerError>
where
    S: AsyncRead + AsyncWrite,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = BufReader::new(read_half);

    let request = match read_request(&mut reader, ctx).await {
        Ok(request) => request,
        Err(e) => {
            logger::log_request_failure(&e);
            None
        }
    };
    let status = ResponseStatus::from_found(request.as_ref().is_some_and(|r| r.found));

    let respond = write_response(&mut write_half, ctx, status, request.as_ref());
    let (header_bytes, body_bytes) = match ctx.write_timeout {
        Some(limit) => timeout(limit, respond)
            .await
            .map_err(|_| HandlerError::Timeout(limit))??,
        None => respond.await?,
    };

    if let Err(e) = write_half.shutdown().await {
        logger::log_debug(&format!("Shutdown after response failed: {e}"));
    }

    Ok(ConnectionSummary {
        status,
        request,
        header_bytes,
        body_bytes,
    })
}

async fn read_request<R>(
    reader: &mut R,
    ctx: &HandlerContext,
) -> Result<Option<Request>, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let read = ctx.reader.read(reader, &ctx.resolver);
    match ctx.read_timeout {
        Some(limit) => timeout(limit, read)
            .await
            .map_err(|_| RequestError::Timeout(limit))?,
        None => read.await,
    }
}

async fn write_response<W>(
    out: &mut W,
    ctx: &HandlerContext,
    status: ResponseStatus,
    request: Option<&Request>,
) -> Result<(usize, u64), HandlerError>
where
    W: AsyncWrite + Unpin,
{
    let location = request.filter(|r| r.found).map(|r| r.location.as_path());
    let content_type = location.map_or(ctx.default_content_type.as_str(), |path| {
        mime::content_type_for(path, &ctx.default_content_type)
    });

    let header = ResponseHeader::new(status, &ctx.server_name, content_type);
    let header_bytes = header
        .write_to(out, ctx.header_ending)
        .await
        .map_err(HandlerError::Header)?;

    let body_error = |source| HandlerError::Body { status, source };
    let body_bytes = ContentRenderer::new(&ctx.tokens)
        .restore_line_breaks(ctx.restore_line_breaks)
        .render(status, location, out)
        .await
        .map_err(body_error)?;
    out.flush().await.map_err(body_error)?;

    Ok((header_bytes, body_bytes))
}
