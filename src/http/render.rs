//! Body rendering
//!
//! Streams a served file line by line with template tokens substituted, or writes
//! the fixed not-found page.

use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::response::ResponseStatus;

/// Body sent for every unresolved request
pub const NOT_FOUND_BODY: &str =
    "<html><head></head><body>\n<h3>File not found</h3>\n</body></html>\n";

/// Format the substituted date, e.g. `Mon Oct 19 15:04:05 +02:00 2026`
///
/// The zone is written as a numeric UTC offset; local zone abbreviations are not
/// available from the system clock.
pub fn format_token_date(now: DateTime<Local>) -> String {
    now.format("%a %b %d %H:%M:%S %:z %Y").to_string()
}

/// Literal markers replaced while rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTokens {
    pub date_token: String,
    pub server_token: String,
    pub server_name: String,
}

impl Default for TemplateTokens {
    fn default() -> Self {
        Self {
            date_token: "<cs371date>".to_string(),
            server_token: "<cs371server>".to_string(),
            server_name: "Luis Server".to_string(),
        }
    }
}

impl TemplateTokens {
    /// Replace both tokens in `line`, borrowing when neither occurs
    pub fn substitute<'l>(&self, line: &'l str, now: DateTime<Local>) -> Cow<'l, str> {
        let has_date = !self.date_token.is_empty() && line.contains(&self.date_token);
        let has_server = !self.server_token.is_empty() && line.contains(&self.server_token);
        if !has_date && !has_server {
            return Cow::Borrowed(line);
        }

        let mut out = line.to_string();
        if has_date {
            out = out.replace(&self.date_token, &format_token_date(now));
        }
        if has_server {
            out = out.replace(&self.server_token, &self.server_name);
        }
        Cow::Owned(out)
    }
}

/// Split a raw line into its content and its `\n` / `\r\n` terminator
fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let content_len = if line.ends_with(b"\r\n") {
        line.len() - 2
    } else if line.ends_with(b"\n") {
        line.len() - 1
    } else {
        line.len()
    };
    line.split_at(content_len)
}

/// Writes response bodies
#[derive(Debug, Clone)]
pub struct ContentRenderer<'a> {
    tokens: &'a TemplateTokens,
    restore_line_breaks: bool,
}

impl<'a> ContentRenderer<'a> {
    pub const fn new(tokens: &'a TemplateTokens) -> Self {
        Self {
            tokens,
            restore_line_breaks: false,
        }
    }

    /// Write each line's terminator back after substitution
    #[must_use]
    pub const fn restore_line_breaks(mut self, restore: bool) -> Self {
        self.restore_line_breaks = restore;
        self
    }

    /// Write the body matching `status`; `location` is only read for `Ok`
    pub async fn render<W>(
        &self,
        status: ResponseStatus,
        location: Option<&Path>,
        out: &mut W,
    ) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        match (status, location) {
            (ResponseStatus::Ok, Some(path)) => self.render_file(path, out).await,
            (ResponseStatus::Ok, None) => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no file location for OK response",
            )),
            (ResponseStatus::NotFound, _) => render_not_found(out).await,
        }
    }

    /// Stream `path` with tokens substituted, returning the bytes written
    pub async fn render_file<W>(&self, path: &Path, out: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(File::open(path).await?);
        let mut line = Vec::new();
        let mut written = 0u64;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }
            let (content, terminator) = split_terminator(&line);

            // Non-UTF-8 lines are passed through untouched
            let rendered = match std::str::from_utf8(content) {
                Ok(text) => match self.tokens.substitute(text, Local::now()) {
                    Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                    Cow::Owned(s) => Cow::Owned(s.into_bytes()),
                },
                Err(_) => Cow::Borrowed(content),
            };
            out.write_all(&rendered).await?;
            written += rendered.len() as u64;

            if self.restore_line_breaks {
                out.write_all(terminator).await?;
                written += terminator.len() as u64;
            }
        }

        Ok(written)
    }
}

/// Write the fixed not-found page
pub async fn render_not_found<W>(out: &mut W) -> io::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(NOT_FOUND_BODY.as_bytes()).await?;
    Ok(NOT_FOUND_BODY.len() as u64)
}
