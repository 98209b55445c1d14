// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub render: RenderConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Listen backlog handed to `listen(2)`
    #[serde(default = "default_backlog")]
    pub backlog: i32,
}

#[allow(clippy::missing_const_for_fn)]
fn default_backlog() -> i32 {
    128
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "common".to_string()
}

/// Performance configuration
///
/// Timeouts are in seconds; `0` disables the deadline.
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

impl PerformanceConfig {
    pub const fn read_deadline(&self) -> Option<Duration> {
        seconds(self.read_timeout)
    }

    pub const fn write_deadline(&self) -> Option<Duration> {
        seconds(self.write_timeout)
    }
}

const fn seconds(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    pub default_content_type: String,
    /// Directory requested paths are resolved against
    pub root_dir: String,
    /// Require `GET` as the first token instead of anywhere in the line
    pub strict_method: bool,
    /// Reject resolved paths that escape `root_dir`
    pub confine_to_root: bool,
    /// Terminate header lines with CRLF instead of a bare LF
    pub crlf_headers: bool,
    pub max_request_bytes: u64,
}

/// Template rendering configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    pub date_token: String,
    pub server_token: String,
    /// Text substituted for `server_token`
    pub server_name: String,
    /// Write each line's terminator back after substitution
    pub restore_line_breaks: bool,
}
