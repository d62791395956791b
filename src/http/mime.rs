use std::path::Path;

/// Content type sent when the extension is missing or unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Maps a file's extension to a content type.
pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().filter(|ext| !ext.is_empty()) else {
        return DEFAULT_CONTENT_TYPE;
    };

    let ext = ext.to_string_lossy().to_ascii_lowercase();
    mime_guess::from_ext(&ext)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}
