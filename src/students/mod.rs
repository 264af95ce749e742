//! Student management
//!
//! Registration, login, and record operations exposed to the protocol layer.

pub mod operations;
pub mod results;
pub mod validation;

pub use operations::StudentService;
pub use results::{LoginResult, MigrateResult, RegisterResult};
