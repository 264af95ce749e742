//! Authentication result types
//!
//! Defines result structures returned by credential operations.

use crate::storage::Student;

/// Outcome of checking a login attempt without touching the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Rejected,
    Verified,
    /// The plain-text stored secret matched; the account should be migrated
    LegacyMatch(Student),
}

/// An account whose migration could not be completed
#[derive(Debug, Clone)]
pub struct MigrationFailure {
    pub id: Option<i32>,
    pub email: String,
    pub reason: String,
}

/// Summary of a bulk migration pass
#[derive(Debug, Clone, Default)]
pub struct MigrationReport {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: Vec<MigrationFailure>,
}

impl MigrationReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
