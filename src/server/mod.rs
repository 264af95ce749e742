//! Server core functionality
//!
//! Listener, accept loop, and per-connection setup.

pub mod core;

pub use self::core::Server;
