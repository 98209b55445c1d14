//! HTTP protocol layer module
//!
//! The four per-connection stages: request reading, path resolution, response
//! header writing and body rendering. Each stage works on plain async byte streams.

pub mod mime;
pub mod path;
pub mod render;
pub mod request;
pub mod response;

// Re-export commonly used types
pub use path::PathResolver;
pub use render::{ContentRenderer, TemplateTokens, NOT_FOUND_BODY};
pub use request::{Request, RequestError, RequestReader};
pub use response::{LineEnding, ResponseHeader, ResponseStatus};
