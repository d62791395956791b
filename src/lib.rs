//! Lantern - Static File Server
//!
//! Core library for request parsing, path resolution and response writing.

pub mod config;
pub mod files;
pub mod http;
pub mod logging;
pub mod server;
