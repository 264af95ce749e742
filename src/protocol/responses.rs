//! Response handling
//!
//! Defines response status codes and line formatting.

use serde::Serialize;

/// Response status codes
pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const READY: u16 = 220;
pub const GOODBYE: u16 = 221;
pub const BAD_REQUEST: u16 = 400;
pub const UNAUTHORIZED: u16 = 401;
pub const NOT_FOUND: u16 = 404;
pub const CONFLICT: u16 = 409;
pub const TOO_MANY_CONNECTIONS: u16 = 421;
pub const INTERNAL_ERROR: u16 = 500;

/// Format a text response line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Format a response line carrying a JSON payload
pub fn format_json<T: Serialize>(code: u16, payload: &T) -> String {
    match serde_json::to_string(payload) {
        Ok(json) => format_response(code, &json),
        Err(e) => {
            log::error!("Failed to serialize response payload: {}", e);
            format_response(INTERNAL_ERROR, "Internal server error")
        }
    }
}
