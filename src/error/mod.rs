//! Error handling
//!
//! Defines error types and handling for the student registry.

pub mod handlers;
pub mod types;

pub use types::*;
