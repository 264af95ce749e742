pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod students;
pub mod token;

pub use server::Server;
