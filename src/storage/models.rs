//! Student record types
//!
//! Defines the stored record, the client-facing view, and the request payloads
//! that create or change records.

use serde::{Deserialize, Serialize};

/// A student account as held by the record store.
///
/// `secret` is either a bcrypt hash or, for records imported from before
/// hashing was enforced, the plain-text password.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Student {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(rename = "password", default)]
    pub secret: String,
    #[serde(default)]
    pub course: String,
}

/// Student as sent to clients. Never carries the stored secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentView {
    pub id: Option<i32>,
    pub name: String,
    pub email: String,
    pub course: String,
}

impl From<&Student> for StudentView {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            name: student.name.clone(),
            email: student.email.clone(),
            course: student.course.clone(),
        }
    }
}

/// Payload of a registration request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub course: String,
}

/// Payload of an update request; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub course: Option<String>,
}
