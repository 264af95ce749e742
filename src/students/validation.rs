//! Input validation for student records

use crate::error::RegistryError;

/// Performs basic input sanitation to check for malformed field values.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Validates the shape of an email address.
///
/// Only structural checks are made; deliverability is not the registry's concern.
pub fn validate_email(email: &str, max_length: usize) -> Result<(), RegistryError> {
    if !is_valid_input(email, max_length) {
        return Err(RegistryError::Validation("Invalid email format".into()));
    }

    if email.contains(char::is_whitespace) {
        return Err(RegistryError::Validation(
            "Email cannot contain whitespace".into(),
        ));
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(RegistryError::Validation("Invalid email format".into())),
    }
}

/// Rejects control characters in free-text profile fields
pub fn validate_profile_field(field: &str, value: &str) -> Result<(), RegistryError> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(RegistryError::Validation(format!(
            "{field} contains invalid characters"
        )));
    }
    Ok(())
}
