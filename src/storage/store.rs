//! Record store contract
//!
//! Keyed lookup and persistence of student records.

use crate::error::StoreError;
use crate::storage::models::Student;

/// Storage backend for student records.
///
/// `save` is an upsert: a record without an id is assigned the next id,
/// a record with an id replaces the stored one. Emails are unique and
/// compared exactly as stored.
pub trait RecordStore: Send + Sync {
    fn find_by_id(&self, id: i32) -> Result<Option<Student>, StoreError>;

    fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError>;

    fn save(&self, student: Student) -> Result<Student, StoreError>;

    fn find_all(&self) -> Result<Vec<Student>, StoreError>;

    /// Returns whether a record was removed.
    fn delete_by_id(&self, id: i32) -> Result<bool, StoreError>;
}
