//! Student record storage
//!
//! Record types, the store contract, and the in-memory implementation.

pub mod memory;
pub mod models;
pub mod store;

pub use memory::InMemoryStore;
pub use models::{Registration, Student, StudentUpdate, StudentView};
pub use store::RecordStore;
