//! Access logging and tracing setup.
//!
//! The access log is a plain append-only text sink, separate from the
//! `tracing` diagnostics. It is passed explicitly to the listener and every
//! connection as an [`AccessLog`], so tests can swap in a [`MemorySink`].
//!
//! Line shapes:
//!
//! ```text
//! [INFO] 2026-10-19T12:00:00Z – 127.0.0.1:51748 – "GET / HTTP/1.1" – 200
//! [INFO] 2026-10-19T12:00:00Z – Server starting on :8080
//! [ERROR] 2026-10-19T12:00:00Z – Accept error: ...
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use tracing_subscriber::EnvFilter;

use crate::http::response::StatusCode;

/// Destination for complete access-log lines.
///
/// Each call receives one full line including its trailing newline and must
/// write it atomically with respect to other calls.
pub trait LogSink: Send + Sync {
    fn append(&self, line: &str) -> std::io::Result<()>;
}

/// Appends to a file, one `write_all` per line under a lock.
pub struct FileSink {
    file: Mutex<File>,
}

impl FileSink {
    /// Opens `path` for appending, creating it and its parent directories.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create logs directory {}", dir.display()))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Could not open log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut file = lock(&self.file);
        file.write_all(line.as_bytes())
    }
}

/// Keeps lines in memory.
#[derive(Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged lines without their trailing newline.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.lines)
            .iter()
            .map(|line| line.trim_end_matches('\n').to_string())
            .collect()
    }
}

impl LogSink for MemorySink {
    fn append(&self, line: &str) -> std::io::Result<()> {
        lock(&self.lines).push(line.to_string());
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Formats access-log lines and hands them to a [`LogSink`].
#[derive(Clone)]
pub struct AccessLog {
    sink: Arc<dyn LogSink>,
}

impl AccessLog {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Records one handled request.
    pub fn request(&self, client: &str, request_line: &str, status: StatusCode) {
        tracing::info!(peer = client, request = request_line, status = status.as_u16(), "Request handled");
        self.write(&request_entry(&timestamp(), client, request_line, status));
    }

    /// Writes an `[INFO]` line and returns it.
    pub fn info(&self, message: &str) -> String {
        let line = message_entry("INFO", &timestamp(), message);
        self.write(&line);
        line
    }

    /// Writes an `[ERROR]` line and returns it.
    pub fn error(&self, message: &str) -> String {
        let line = message_entry("ERROR", &timestamp(), message);
        self.write(&line);
        line
    }

    fn write(&self, line: &str) {
        if let Err(e) = self.sink.append(line) {
            tracing::error!(error = %e, "Failed to write access log");
        }
    }
}

/// RFC 3339 UTC timestamp with second precision, e.g. `2026-10-19T12:00:00Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// `[INFO] <ts> – <client> – "<request line>" – <status>`; the request line
/// is escaped so a hostile client cannot forge extra lines.
pub fn request_entry(ts: &str, client: &str, request_line: &str, status: StatusCode) -> String {
    format!(
        "[INFO] {} – {} – {:?} – {}\n",
        ts,
        client,
        request_line,
        status.as_u16()
    )
}

pub fn message_entry(level: &str, ts: &str, message: &str) -> String {
    format!("[{level}] {ts} – {message}\n")
}

/// Installs the `tracing` subscriber for diagnostics; `RUST_LOG` filters,
/// defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();
}
