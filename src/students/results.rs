//! Student service result types
//!
//! Defines the payloads returned by registration, login, and migration.

use serde::Serialize;

use crate::auth::MigrationReport;
use crate::storage::StudentView;

/// Result of a successful registration
#[derive(Debug, Clone, Serialize)]
pub struct RegisterResult {
    pub token: String,
    pub student: StudentView,
    pub message: String,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub email: String,
    pub message: String,
}

/// Result of a migration pass, as reported to clients
#[derive(Debug, Clone, Serialize)]
pub struct MigrateResult {
    pub migrated: usize,
    pub skipped: usize,
    pub failed: usize,
    pub message: String,
}

impl From<&MigrationReport> for MigrateResult {
    fn from(report: &MigrationReport) -> Self {
        let message = if report.is_clean() {
            "Password migration completed successfully".to_string()
        } else {
            "Password migration completed with failures".to_string()
        };
        Self {
            migrated: report.migrated,
            skipped: report.skipped,
            failed: report.failed_count(),
            message,
        }
    }
}
