//! In-memory record store
//!
//! Holds student records in an ordered map behind a read/write lock. Records can
//! be seeded from a JSON legacy export, which is how plain-text secrets enter
//! the system.

use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::StoreError;
use crate::storage::models::Student;
use crate::storage::store::RecordStore;

#[derive(Default)]
struct StoreInner {
    students: BTreeMap<i32, Student>,
    next_id: i32,
}

impl StoreInner {
    fn email_taken_by_other(&self, email: &str, id: Option<i32>) -> bool {
        self.students
            .values()
            .any(|s| s.email == email && s.id != id)
    }
}

/// Thread-safe in-memory `RecordStore`
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store pre-populated with the given records.
    ///
    /// Records are saved in order, so later duplicates of an email are rejected.
    pub fn with_students(students: Vec<Student>) -> Result<Self, StoreError> {
        let store = Self::new();
        for student in students {
            store.save(student)?;
        }
        Ok(store)
    }

    /// Loads a JSON array of legacy student records.
    pub fn from_seed_file(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path)?;
        let students: Vec<Student> = serde_json::from_str(&raw)
            .map_err(|e| StoreError::InvalidSeed(format!("{}: {}", path.display(), e)))?;

        let count = students.len();
        let store = Self::with_students(students)?;
        info!("Imported {} student records from {}", count, path.display());
        Ok(store)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreInner>, StoreError> {
        self.inner.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreInner>, StoreError> {
        self.inner.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl RecordStore for InMemoryStore {
    fn find_by_id(&self, id: i32) -> Result<Option<Student>, StoreError> {
        Ok(self.read()?.students.get(&id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Student>, StoreError> {
        Ok(self
            .read()?
            .students
            .values()
            .find(|s| s.email == email)
            .cloned())
    }

    fn save(&self, mut student: Student) -> Result<Student, StoreError> {
        let mut inner = self.write()?;

        if inner.email_taken_by_other(&student.email, student.id) {
            return Err(StoreError::DuplicateEmail(student.email));
        }

        let id = match student.id {
            Some(id) => id,
            None => inner
                .next_id
                .checked_add(1)
                .ok_or(StoreError::IdSpaceExhausted)?,
        };
        // Ids are never handed out twice, even after deletes
        inner.next_id = inner.next_id.max(id);
        student.id = Some(id);

        inner.students.insert(id, student.clone());
        Ok(student)
    }

    fn find_all(&self) -> Result<Vec<Student>, StoreError> {
        Ok(self.read()?.students.values().cloned().collect())
    }

    fn delete_by_id(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.write()?.students.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn student(email: &str, secret: &str) -> Student {
        Student {
            id: None,
            name: "Test".into(),
            email: email.into(),
            secret: secret.into(),
            course: "CS".into(),
        }
    }

    #[test]
    fn test_save_assigns_sequential_ids() {
        let store = InMemoryStore::new();
        let a = store.save(student("a@x.io", "s")).unwrap();
        let b = store.save(student("b@x.io", "s")).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = InMemoryStore::new();
        let a = store.save(student("a@x.io", "s")).unwrap();
        assert!(store.delete_by_id(a.id.unwrap()).unwrap());
        let b = store.save(student("b@x.io", "s")).unwrap();
        assert_eq!(b.id, Some(2));
    }

    #[test]
    fn test_save_with_id_replaces_record() {
        let store = InMemoryStore::new();
        let mut a = store.save(student("a@x.io", "old")).unwrap();
        a.secret = "new".into();
        store.save(a.clone()).unwrap();

        assert_eq!(store.find_all().unwrap().len(), 1);
        assert_eq!(store.find_by_id(1).unwrap().unwrap().secret, "new");
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let store = InMemoryStore::new();
        store.save(student("a@x.io", "s")).unwrap();
        let err = store.save(student("a@x.io", "t")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(e) if e == "a@x.io"));
    }

    #[test]
    fn test_email_lookup_is_case_sensitive() {
        let store = InMemoryStore::new();
        store.save(student("Alice@x.io", "s")).unwrap();
        assert!(store.find_by_email("Alice@x.io").unwrap().is_some());
        assert!(store.find_by_email("alice@x.io").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_returns_false() {
        let store = InMemoryStore::new();
        assert!(!store.delete_by_id(42).unwrap());
    }

    #[test]
    fn test_seed_file_keeps_ids_and_plain_secrets() {
        let path = std::env::temp_dir().join(format!(
            "student-registry-seed-{}.json",
            std::process::id()
        ));
        let mut file = fs::File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"id": 10, "name": "Legacy", "email": "old@x.io", "password": "secret123", "course": "Math"}},
                {{"email": "new@x.io", "password": "pw"}}
            ]"#
        )
        .unwrap();

        let store = InMemoryStore::from_seed_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let legacy = store.find_by_id(10).unwrap().unwrap();
        assert_eq!(legacy.secret, "secret123");
        assert_eq!(store.find_by_email("new@x.io").unwrap().unwrap().id, Some(11));
    }

    #[test]
    fn test_exhausted_id_space_is_an_error() {
        let mut top = student("top@x.io", "secret123");
        top.id = Some(i32::MAX);
        let store = InMemoryStore::with_students(vec![top]).unwrap();

        let err = store.save(student("new@x.io", "pw")).unwrap_err();
        assert!(matches!(err, StoreError::IdSpaceExhausted));

        // The failed save leaves the store usable
        assert_eq!(store.find_all().unwrap().len(), 1);
        assert!(store.find_by_email("new@x.io").unwrap().is_none());
        let mut existing = store.find_by_id(i32::MAX).unwrap().unwrap();
        existing.secret = "rehashed".into();
        assert_eq!(store.save(existing).unwrap().id, Some(i32::MAX));
    }

    #[test]
    fn test_seed_file_rejects_bad_json() {
        let path = std::env::temp_dir().join(format!(
            "student-registry-bad-seed-{}.json",
            std::process::id()
        ));
        fs::write(&path, "not json").unwrap();
        let result = InMemoryStore::from_seed_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(StoreError::InvalidSeed(_))));
    }
}
