// Handler context module
// Read-only settings shared by every connection handler

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::http::{LineEnding, PathResolver, RequestReader, TemplateTokens};

/// Everything a connection handler needs besides its stream
///
/// Built once at startup and shared behind an `Arc`; handlers never mutate it.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub reader: RequestReader,
    pub resolver: PathResolver,
    pub tokens: TemplateTokens,
    /// Value of the `Server` header
    pub server_name: String,
    pub default_content_type: String,
    pub header_ending: LineEnding,
    pub restore_line_breaks: bool,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl HandlerContext {
    /// Context serving `root` with the stock settings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            reader: RequestReader::new(8192),
            resolver: PathResolver::new(root),
            tokens: TemplateTokens::default(),
            server_name: "Jon's very own server".to_string(),
            default_content_type: "text/html".to_string(),
            header_ending: LineEnding::Lf,
            restore_line_breaks: false,
            read_timeout: None,
            write_timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let http = &config.http;
        let render = &config.render;

        Self {
            reader: RequestReader::new(http.max_request_bytes).strict_method(http.strict_method),
            resolver: PathResolver::new(&http.root_dir).confine_to_root(http.confine_to_root),
            tokens: TemplateTokens {
                date_token: render.date_token.clone(),
                server_token: render.server_token.clone(),
                server_name: render.server_name.clone(),
            },
            server_name: http.server_name.clone(),
            default_content_type: http.default_content_type.clone(),
            header_ending: if http.crlf_headers {
                LineEnding::CrLf
            } else {
                LineEnding::Lf
            },
            restore_line_breaks: render.restore_line_breaks,
            read_timeout: config.performance.read_deadline(),
            write_timeout: config.performance.write_deadline(),
        }
    }
}
