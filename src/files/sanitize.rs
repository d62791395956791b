//! Lexical path cleaning and traversal rejection.
//!
//! Two independent layers guard the served root: [`normalize`] collapses the
//! path as a string, then [`sanitize`] rejects any `..` segment that survived.
//! `normalize` never drops a `..` that would climb above `/`, so an input such
//! as `/../etc/passwd` keeps its `..` and is caught by the segment check
//! instead of silently turning into `/etc/passwd`.

/// Why a raw request path was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("null byte in path")]
    NullByte,
    #[error("path is not absolute")]
    NotAbsolute,
    #[error("path traversal attempt")]
    Traversal,
}

/// A request path that passed [`sanitize`]: absolute, normalized, free of
/// `..` segments and null bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanPath(String);

impl CleanPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The path without its leading `/`, ready to be joined onto a root.
    pub fn relative(&self) -> &str {
        self.0.trim_start_matches('/')
    }
}

impl std::fmt::Display for CleanPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates and normalizes a raw request path.
///
/// # Example
///
/// ```
/// # use lantern::files::sanitize::{sanitize, PathError};
/// assert_eq!(sanitize("/a/./b//c.txt").unwrap().as_str(), "/a/b/c.txt");
/// assert_eq!(sanitize("/../etc/passwd"), Err(PathError::Traversal));
/// ```
pub fn sanitize(raw_path: &str) -> Result<CleanPath, PathError> {
    if raw_path.contains('\0') {
        return Err(PathError::NullByte);
    }

    let cleaned = normalize(raw_path);

    if !cleaned.starts_with('/') {
        return Err(PathError::NotAbsolute);
    }

    if cleaned.split('/').any(|segment| segment == "..") {
        return Err(PathError::Traversal);
    }

    Ok(CleanPath(cleaned))
}

/// Collapses `.`, `..` and repeated separators using string rules only.
///
/// A `..` cancels the previous real segment. With nothing left to cancel it
/// is kept, for rooted paths as well as relative ones. The empty path
/// normalizes to `.`.
pub fn normalize(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}
