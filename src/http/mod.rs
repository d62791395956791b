//! HTTP protocol implementation.
//!
//! A deliberately small subset of HTTP/1.1: one request per connection, the
//! request line is parsed, headers are read and thrown away, and every
//! response closes the connection.
//!
//! # Architecture
//!
//! - **`connection`**: The per-connection state machine
//! - **`parser`**: Reads the request line and discards headers
//! - **`request`**: Request line representation
//! - **`response`**: Status codes and fully-built responses
//! - **`writer`**: Serializes and writes responses to the client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌────────────────────┐
//!        │ ReadingRequestLine │ ── malformed ──┐
//!        └─────────┬──────────┘                │
//!                  ▼                           │
//!        ┌────────────────────┐                │
//!        │   ReadingHeaders   │ ── EOF/err ────┤
//!        └─────────┬──────────┘                ▼
//!                  ▼                     ┌──────────┐
//!        ┌────────────────────┐          │ Rejected │
//!        │     Resolving      │          └────┬─────┘
//!        └─────────┬──────────┘               │
//!                  ▼                          │
//!        ┌────────────────────┐               │
//!        │      Writing       │ ── 200 write failed ─┐
//!        └─────────┬──────────┘               │      │
//!                  ▼                          │      │
//!        ┌────────────────────┐               │      │
//!        │      Logging       │               │      │
//!        └─────────┬──────────┘               │      │
//!                  ▼                          ▼      ▼
//!        ┌──────────────────────────────────────────────┐
//!        │                    Closed                    │
//!        └──────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use lantern::files::DocumentRoot;
//! use lantern::http::connection::Connection;
//! use lantern::logging::{AccessLog, MemorySink};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let log = AccessLog::new(Arc::new(MemorySink::new()));
//!
//!     loop {
//!         let (socket, peer) = listener.accept().await?;
//!         let mut conn = Connection::new(socket, peer.to_string(), DocumentRoot::new("public"), log.clone());
//!         tokio::spawn(async move { conn.run().await });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
