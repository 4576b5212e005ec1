//! Extension based MIME type lookup.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;

/// Returned when the filename has no extension or the extension is not in the table.
pub const DEFAULT_MIME_TYPE: &str = "text/plain";

static EXTENSION_TO_MIME_TYPE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // images
        ("bmp", "image/bmp"),
        ("gif", "image/gif"),
        ("heic", "image/heic"),
        ("ico", "image/x-icon"),
        ("jpe", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpeg"),
        ("png", "image/png"),
        ("psd", "image/vnd.adobe.photoshop"),
        ("svg", "image/svg+xml"),
        ("tif", "image/tiff"),
        ("tiff", "image/tiff"),
        ("webp", "image/webp"),
        // documents
        ("csv", "text/csv"),
        ("doc", "application/msword"),
        ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        ("eps", "application/postscript"),
        ("htm", "text/html"),
        ("html", "text/html"),
        ("json", "application/json"),
        ("key", "application/vnd.apple.keynote"),
        ("numbers", "application/vnd.apple.numbers"),
        ("odp", "application/vnd.oasis.opendocument.presentation"),
        ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
        ("odt", "application/vnd.oasis.opendocument.text"),
        ("pages", "application/vnd.apple.pages"),
        ("pdf", "application/pdf"),
        ("ppt", "application/vnd.ms-powerpoint"),
        ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
        ("rtf", "text/rtf"),
        ("txt", "text/plain"),
        ("xls", "application/vnd.ms-excel"),
        ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        ("xml", "application/xml"),
        // audio
        ("aac", "audio/aac"),
        ("aif", "audio/x-aiff"),
        ("aiff", "audio/x-aiff"),
        ("flac", "audio/flac"),
        ("m4a", "audio/mp4"),
        ("mid", "audio/midi"),
        ("mp3", "audio/mpeg"),
        ("ogg", "audio/ogg"),
        ("wav", "audio/x-wav"),
        // video
        ("avi", "video/x-msvideo"),
        ("m4v", "video/x-m4v"),
        ("mov", "video/quicktime"),
        ("mp4", "video/mp4"),
        ("mpeg", "video/mpeg"),
        ("mpg", "video/mpeg"),
        ("webm", "video/webm"),
        ("wmv", "video/x-ms-wmv"),
        // archives
        ("7z", "application/x-7z-compressed"),
        ("gz", "application/gzip"),
        ("rar", "application/vnd.rar"),
        ("tar", "application/x-tar"),
        ("zip", "application/zip"),
    ])
});

/// MIME type for `filename`, judged by its (case-insensitive) extension.
pub fn detect_by_filename(filename: &str) -> &'static str {
    let Some(extension) = Path::new(filename).extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME_TYPE;
    };
    EXTENSION_TO_MIME_TYPE
        .get(extension.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_MIME_TYPE)
}
