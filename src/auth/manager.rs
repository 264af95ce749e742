//! Credential manager
//!
//! Owns the password-credential lifecycle: hashing secrets on registration and
//! update, verifying login attempts, and migrating legacy plain-text secrets to
//! bcrypt either inline on a matching login or in a bulk pass.

use log::{debug, info, warn};
use std::sync::Arc;

use crate::auth::format::SecretFormat;
use crate::auth::hasher::PasswordHasher;
use crate::auth::results::{LoginOutcome, MigrationFailure, MigrationReport};
use crate::error::{CredentialError, StoreError};
use crate::storage::{RecordStore, Registration, Student};

pub struct CredentialManager {
    store: Arc<dyn RecordStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn RecordStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Hashes the registration's password and saves a new account.
    ///
    /// Nothing is written when the email or password is empty.
    pub fn register(&self, registration: Registration) -> Result<Student, CredentialError> {
        if registration.email.is_empty() {
            return Err(CredentialError::InvalidInput("Email cannot be empty".into()));
        }
        if registration.password.is_empty() {
            return Err(CredentialError::InvalidInput(
                "Password cannot be empty".into(),
            ));
        }

        let secret = self.hasher.hash(&registration.password)?;
        let student = Student {
            id: None,
            name: registration.name,
            email: registration.email,
            secret,
            course: registration.course,
        };

        let saved = self.store.save(student)?;
        info!("Registered student {:?} <{}>", saved.id, saved.email);
        Ok(saved)
    }

    /// Checks a login attempt. Never writes to the store.
    ///
    /// Unknown emails and wrong passwords both yield `Rejected`.
    pub fn check_login(&self, email: &str, plain: &str) -> Result<LoginOutcome, StoreError> {
        if plain.is_empty() {
            return Ok(LoginOutcome::Rejected);
        }

        let Some(student) = self.store.find_by_email(email)? else {
            return Ok(LoginOutcome::Rejected);
        };

        if student.secret.is_empty() {
            return Ok(LoginOutcome::Rejected);
        }

        let outcome = match SecretFormat::classify(&student.secret) {
            SecretFormat::Hashed { value, .. } => {
                if self.hasher.verify(plain, value) {
                    LoginOutcome::Verified
                } else {
                    LoginOutcome::Rejected
                }
            }
            SecretFormat::PlainText(value) => {
                if value.as_bytes() == plain.as_bytes() {
                    LoginOutcome::LegacyMatch(student.clone())
                } else {
                    LoginOutcome::Rejected
                }
            }
        };

        Ok(outcome)
    }

    /// Verifies a login attempt, migrating a matching plain-text secret in place.
    ///
    /// Migration is best-effort: if it fails the login still succeeds and the
    /// account stays plain text until the next attempt.
    pub fn verify_login(&self, email: &str, plain: &str) -> Result<bool, StoreError> {
        match self.check_login(email, plain)? {
            LoginOutcome::Rejected => Ok(false),
            LoginOutcome::Verified => Ok(true),
            LoginOutcome::LegacyMatch(student) => {
                if let Err(e) = self.migrate_on_successful_login(student, plain) {
                    warn!("Could not migrate legacy credential for {}: {}", email, e);
                }
                Ok(true)
            }
        }
    }

    /// Replaces a legacy secret with the hash of the password that just matched it.
    ///
    /// The write is an upsert of the record read by `check_login`, so a delete
    /// that lands between the check and this save is undone: the record comes
    /// back with the hashed secret.
    pub fn migrate_on_successful_login(
        &self,
        mut student: Student,
        plain: &str,
    ) -> Result<Student, CredentialError> {
        student.secret = self.hasher.hash(plain)?;
        let saved = self.store.save(student)?;
        info!("Migrated legacy credential for {} on login", saved.email);
        Ok(saved)
    }

    /// Hashes every plain-text secret in the store.
    ///
    /// Hashed and empty secrets are skipped. A failure on one account is
    /// recorded in the report and the pass continues with the next one.
    pub fn migrate_all(&self) -> Result<MigrationReport, StoreError> {
        let mut report = MigrationReport::default();

        for mut student in self.store.find_all()? {
            let plain = match SecretFormat::classify(&student.secret) {
                SecretFormat::Hashed { .. } => {
                    report.skipped += 1;
                    continue;
                }
                SecretFormat::PlainText("") => {
                    warn!("Student {:?} has no stored secret; skipping", student.id);
                    report.skipped += 1;
                    continue;
                }
                SecretFormat::PlainText(value) => value.to_string(),
            };

            let result = self.hasher.hash(&plain).and_then(|hashed| {
                student.secret = hashed;
                self.store.save(student.clone()).map_err(CredentialError::from)
            });

            match result {
                Ok(saved) => {
                    debug!("Migrated credential for student {:?}", saved.id);
                    report.migrated += 1;
                }
                Err(e) => {
                    warn!("Failed to migrate credential for {}: {}", student.email, e);
                    report.failed.push(MigrationFailure {
                        id: student.id,
                        email: student.email,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Password migration completed: {} migrated, {} skipped, {} failed",
            report.migrated,
            report.skipped,
            report.failed_count()
        );
        Ok(report)
    }

    /// Hashes a newly supplied password onto the record. Does not persist.
    ///
    /// Returns whether the secret changed; an absent or empty password is a no-op.
    pub fn update_secret(
        &self,
        student: &mut Student,
        new_plain: Option<&str>,
    ) -> Result<bool, CredentialError> {
        match new_plain {
            Some(plain) if !plain.is_empty() => {
                student.secret = self.hasher.hash(plain)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
