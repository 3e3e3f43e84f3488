// src/media.rs
// =============================================================================
// Media types and file extensions the spider understands.
//
// Only a handful of image formats are downloaded. Each allowed MIME type maps
// to one canonical extension, and each allowed extension maps back to a
// canonical MIME type so "photo.jpeg" and "image/jpeg" are seen as agreeing.
// =============================================================================

/// Extensions (without the dot) accepted for downloaded images
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Extensions that mark a local file as an HTML document
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

// What a Content-Type header says about a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaKind {
    Html,
    /// Holds the essence, e.g. "image/png"
    Image(String),
    Other,
}

// Strips parameters ("; charset=...") and lowercases
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

pub fn classify(content_type: &str) -> MediaKind {
    let essence = essence(content_type);
    if essence == "text/html" || essence == "application/xhtml+xml" {
        MediaKind::Html
    } else if essence.starts_with("image/") {
        MediaKind::Image(essence)
    } else {
        MediaKind::Other
    }
}

// Canonical extension for an allowed image MIME type
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    match essence(mime).as_str() {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/bmp" | "image/x-bmp" | "image/x-ms-bmp" => Some("bmp"),
        _ => None,
    }
}

// Canonical extension for an allowed file extension ("jpeg" -> "jpg")
pub fn canonical_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "bmp" => Some("bmp"),
        _ => None,
    }
}

pub fn is_allowed_extension(ext: &str) -> bool {
    canonical_extension(ext).is_some()
}

pub fn is_html_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    HTML_EXTENSIONS.contains(&ext.as_str())
}
