//! Student service operations
//!
//! Registration, login, CRUD, and migration on top of the credential manager,
//! the record store, and the token issuer.

use log::info;
use std::sync::Arc;

use crate::auth::{BcryptHasher, CredentialManager, MigrationReport, PasswordHasher};
use crate::config::StartupConfig;
use crate::error::{AuthError, RegistryError, StoreError};
use crate::storage::{InMemoryStore, RecordStore, Registration, Student, StudentUpdate, StudentView};
use crate::students::results::{LoginResult, RegisterResult};
use crate::students::validation::{validate_email, validate_profile_field};
use crate::token::{JwtIssuer, TokenIssuer};

pub struct StudentService {
    store: Arc<dyn RecordStore>,
    credentials: CredentialManager,
    tokens: Arc<dyn TokenIssuer>,
    max_email_length: usize,
}

impl StudentService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
        max_email_length: usize,
    ) -> Self {
        let credentials = CredentialManager::new(Arc::clone(&store), hasher);
        Self {
            store,
            credentials,
            tokens,
            max_email_length,
        }
    }

    /// Builds the service from startup configuration, importing the seed file if set
    pub fn from_config(config: &StartupConfig) -> Result<Self, RegistryError> {
        let store = match config.seed_path() {
            Some(path) => InMemoryStore::from_seed_file(&path)?,
            None => InMemoryStore::new(),
        };

        Ok(Self::new(
            Arc::new(store),
            Arc::new(BcryptHasher::new(config.bcrypt_cost)),
            Arc::new(JwtIssuer::new(&config.jwt_secret, config.token_ttl())),
            config.max_email_length,
        ))
    }

    /// Registers a student and issues a token for immediate login
    pub fn register(&self, registration: Registration) -> Result<RegisterResult, RegistryError> {
        validate_email(&registration.email, self.max_email_length)?;
        validate_profile_field("name", &registration.name)?;
        validate_profile_field("course", &registration.course)?;

        let student = self.credentials.register(registration)?;
        let token = self.tokens.issue_token(&student.email)?;

        Ok(RegisterResult {
            token,
            student: StudentView::from(&student),
            message: "Registration successful".into(),
        })
    }

    /// Authenticates a student, migrating a legacy secret on success
    pub fn login(&self, email: &str, password: &str) -> Result<LoginResult, RegistryError> {
        if !self.credentials.verify_login(email, password)? {
            return Err(AuthError::InvalidCredentials.into());
        }

        info!("Login successful for {}", email);
        Ok(LoginResult {
            token: self.tokens.issue_token(email)?,
            email: email.to_string(),
            message: "Login successful".into(),
        })
    }

    /// Resolves a bearer token to the email it was issued for
    pub fn authenticate_token(&self, token: &str) -> Result<String, RegistryError> {
        Ok(self.tokens.validate_token(token)?)
    }

    pub fn list_students(&self) -> Result<Vec<StudentView>, RegistryError> {
        Ok(self
            .store
            .find_all()?
            .iter()
            .map(StudentView::from)
            .collect())
    }

    pub fn get_student(&self, id: i32) -> Result<StudentView, RegistryError> {
        self.find(id).map(|s| StudentView::from(&s))
    }

    /// Applies the present fields of `update` to a stored student
    pub fn update_student(
        &self,
        id: i32,
        update: StudentUpdate,
    ) -> Result<StudentView, RegistryError> {
        let mut student = self.find(id)?;

        if let Some(email) = update.email {
            validate_email(&email, self.max_email_length)?;
            student.email = email;
        }
        if let Some(name) = update.name {
            validate_profile_field("name", &name)?;
            student.name = name;
        }
        if let Some(course) = update.course {
            validate_profile_field("course", &course)?;
            student.course = course;
        }
        self.credentials
            .update_secret(&mut student, update.password.as_deref())?;

        let saved = self.store.save(student)?;
        info!("Updated student {}", id);
        Ok(StudentView::from(&saved))
    }

    pub fn delete_student(&self, id: i32) -> Result<(), RegistryError> {
        if self.store.delete_by_id(id)? {
            info!("Deleted student {}", id);
            Ok(())
        } else {
            Err(StoreError::NotFound(id).into())
        }
    }

    /// Hashes every remaining plain-text secret
    pub fn migrate_passwords(&self) -> Result<MigrationReport, RegistryError> {
        Ok(self.credentials.migrate_all()?)
    }

    fn find(&self, id: i32) -> Result<Student, RegistryError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(id).into())
    }
}
