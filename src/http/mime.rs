//! MIME type detection module
//!
//! Maps a served file's extension to its Content-Type.

use std::path::Path;

/// Get MIME Content-Type based on file extension
///
/// Returns `None` for unknown or missing extensions so the caller can apply its
/// configured default.
///
/// # Examples
/// ```
/// use webworker::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("html")), Some("text/html"));
/// assert_eq!(get_content_type(Some("PNG")), Some("image/png"));
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let extension = extension?.to_ascii_lowercase();
    let content_type = match extension.as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" | "md" => "text/plain",
        "xml" => "application/xml",
        "csv" => "text/csv",

        // Scripts and data
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "wasm" => "application/wasm",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => return None,
    };
    Some(content_type)
}

/// Content-Type for a resolved file, falling back to `default` when the extension is unknown
pub fn content_type_for<'a>(path: &Path, default: &'a str) -> &'a str {
    get_content_type(path.extension().and_then(|e| e.to_str())).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("html")), Some("text/html"));
        assert_eq!(get_content_type(Some("htm")), Some("text/html"));
        assert_eq!(get_content_type(Some("css")), Some("text/css"));
        assert_eq!(get_content_type(Some("js")), Some("application/javascript"));
        assert_eq!(get_content_type(Some("json")), Some("application/json"));
        assert_eq!(get_content_type(Some("Gif")), Some("image/gif"));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), None);
        assert_eq!(get_content_type(None), None);
    }

    #[test]
    fn test_default_for_resolved_paths() {
        assert_eq!(content_type_for(Path::new("site/logo.png"), "text/html"), "image/png");
        assert_eq!(content_type_for(Path::new("README"), "text/html"), "text/html");
        assert_eq!(content_type_for(Path::new("notes.unknown"), "text/html"), "text/html");
    }
}
