//! Connection supervision: binding the listen address and spawning one task
//! per accepted connection.

pub mod listener;

pub use listener::Server;
