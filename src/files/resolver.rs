use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncReadExt;

use crate::files::sanitize::CleanPath;
use crate::http::mime::content_type_for;

/// Index documents tried, in order, when a directory is requested.
pub const INDEX_FILES: [&str; 2] = ["index.html", "index"];

/// An opened file that is known to live inside the served root.
#[derive(Debug)]
pub struct ServableFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    file: File,
}

impl ServableFile {
    /// Reads the whole file. Headers need the length up front, so the body
    /// is never streamed.
    pub async fn read_body(mut self) -> std::io::Result<Vec<u8>> {
        let mut body = Vec::new();
        self.file.read_to_end(&mut body).await?;
        Ok(body)
    }

    /// Opens `path` without the containment check.
    #[cfg(test)]
    pub(crate) async fn open_unchecked(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            content_type: content_type_for(path),
            file: File::open(path).await?,
        })
    }
}

/// Outcome of mapping a clean request path onto the served root.
#[derive(Debug)]
pub enum ResolvedTarget {
    /// The path named a regular file.
    File(ServableFile),
    /// The path named a directory and its index document was substituted.
    DirectoryIndex(ServableFile),
    NotFound,
    Forbidden,
}

impl ResolvedTarget {
    pub fn kind(&self) -> TargetKind {
        match self {
            ResolvedTarget::File(_) => TargetKind::File,
            ResolvedTarget::DirectoryIndex(_) => TargetKind::DirectoryIndex,
            ResolvedTarget::NotFound => TargetKind::NotFound,
            ResolvedTarget::Forbidden => TargetKind::Forbidden,
        }
    }

    pub fn into_file(self) -> Option<ServableFile> {
        match self {
            ResolvedTarget::File(file) | ResolvedTarget::DirectoryIndex(file) => Some(file),
            ResolvedTarget::NotFound | ResolvedTarget::Forbidden => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    DirectoryIndex,
    NotFound,
    Forbidden,
}

/// The directory tree files are served from.
#[derive(Debug, Clone)]
pub struct DocumentRoot {
    path: PathBuf,
}

impl DocumentRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps a sanitized path to a file under the root.
    ///
    /// Only a missing target is reported as `NotFound`. Every other failure
    /// (stat, open, directory without index, symlink leaving the root) is
    /// `Forbidden`.
    pub async fn resolve(&self, clean: &CleanPath) -> ResolvedTarget {
        let local = self.path.join(clean.relative());

        let meta = match tokio::fs::metadata(&local).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => return ResolvedTarget::NotFound,
            Err(e) => {
                tracing::warn!(path = %local.display(), error = %e, "Stat error");
                return ResolvedTarget::Forbidden;
            }
        };

        if !meta.is_dir() {
            return match self.open(&local).await {
                Some(file) => ResolvedTarget::File(file),
                None => ResolvedTarget::Forbidden,
            };
        }

        let Some(index) = find_index(&local).await else {
            tracing::debug!(path = %local.display(), "Directory without index");
            return ResolvedTarget::Forbidden;
        };

        match self.open(&index).await {
            Some(file) => ResolvedTarget::DirectoryIndex(file),
            None => ResolvedTarget::Forbidden,
        }
    }

    /// Reads a file directly inside the root, used for custom error pages.
    ///
    /// Returns `None` when the file is missing, unreadable, not a regular file
    /// or resolves outside the root.
    pub async fn read_page(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.path.join(name);
        let meta = tokio::fs::metadata(&path).await.ok()?;
        if !meta.is_file() {
            return None;
        }

        let file = self.open(&path).await?;
        file.read_body().await.ok()
    }

    /// Opens `local` once it is proven to live under the canonical root.
    async fn open(&self, local: &Path) -> Option<ServableFile> {
        if !self.contains(local).await {
            tracing::warn!(path = %local.display(), "Target escapes the served root");
            return None;
        }

        match File::open(local).await {
            Ok(file) => Some(ServableFile {
                path: local.to_path_buf(),
                content_type: content_type_for(local),
                file,
            }),
            Err(e) => {
                tracing::warn!(path = %local.display(), error = %e, "Open error");
                None
            }
        }
    }

    /// Whether the canonical form of `local` lies under the canonical root.
    async fn contains(&self, local: &Path) -> bool {
        let (Ok(root), Ok(target)) = (
            tokio::fs::canonicalize(&self.path).await,
            tokio::fs::canonicalize(local).await,
        ) else {
            return false;
        };

        target.starts_with(root)
    }
}

/// Looks for an index document directly inside `dir`.
async fn find_index(dir: &Path) -> Option<PathBuf> {
    for name in INDEX_FILES {
        let candidate = dir.join(name);
        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if !meta.is_dir() => return Some(candidate),
            _ => continue,
        }
    }

    None
}
