//! Roster store boundary.
//!
//! The roster import pipeline consumes the datastore through this trait:
//! two group operations, one existence read for boletas, and one bulk
//! insert. Each call is atomic and strongly consistent for the immediately
//! following read within the same pipeline run.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbError;
use crate::models::{Group, NewStudent, Student};

/// Read/insert capability the roster pipeline needs from the datastore.
#[async_trait]
pub trait RosterStore: Send + Sync {
    /// Fetch groups whose normalized (trimmed, lowercased) label matches
    /// any of the given labels.
    async fn find_groups_by_labels(&self, labels: &[String]) -> Result<Vec<Group>, DbError>;

    /// Bulk-create one group per label, preserving original casing.
    async fn create_groups(&self, labels: &[String]) -> Result<Vec<Group>, DbError>;

    /// Return the subset of the given boletas already present in the store.
    async fn find_existing_boletas(&self, boletas: &[String]) -> Result<Vec<String>, DbError>;

    /// Insert student drafts in one all-or-nothing operation, returning
    /// the inserted count.
    async fn insert_students(&self, students: &[NewStudent]) -> Result<u64, DbError>;
}

/// Postgres-backed roster store.
#[derive(Clone)]
pub struct PgRosterStore {
    pool: PgPool,
}

impl PgRosterStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Access the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// In-memory roster store for tests and local development.
///
/// Mirrors the Postgres store's semantics: normalized label matching,
/// store-wide boleta uniqueness enforced at insert, all-or-nothing bulk
/// insert. Individual operations can be made to fail to exercise the
/// pipeline's fatal paths.
#[derive(Default)]
pub struct MemoryRosterStore {
    inner: std::sync::Mutex<MemoryInner>,
    fail_group_lookup: std::sync::atomic::AtomicBool,
    fail_group_create: std::sync::atomic::AtomicBool,
    fail_boleta_lookup: std::sync::atomic::AtomicBool,
    fail_insert: std::sync::atomic::AtomicBool,
}

#[derive(Default)]
struct MemoryInner {
    groups: Vec<Group>,
    students: Vec<NewStudent>,
}

impl MemoryRosterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `find_groups_by_labels` fail until cleared.
    pub fn fail_group_lookup(&self, fail: bool) {
        self.fail_group_lookup
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Make `create_groups` fail until cleared.
    pub fn fail_group_create(&self, fail: bool) {
        self.fail_group_create
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Make `find_existing_boletas` fail until cleared.
    pub fn fail_boleta_lookup(&self, fail: bool) {
        self.fail_boleta_lookup
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Make `insert_students` fail until cleared.
    pub fn fail_insert(&self, fail: bool) {
        self.fail_insert
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Snapshot of all stored groups.
    #[must_use]
    pub fn groups(&self) -> Vec<Group> {
        self.inner.lock().expect("store lock").groups.clone()
    }

    /// Snapshot of all stored students.
    #[must_use]
    pub fn students(&self) -> Vec<NewStudent> {
        self.inner.lock().expect("store lock").students.clone()
    }

    fn check(flag: &std::sync::atomic::AtomicBool, op: &str) -> Result<(), DbError> {
        if flag.load(std::sync::atomic::Ordering::SeqCst) {
            Err(DbError::Unavailable(format!("{op}: simulated failure")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RosterStore for MemoryRosterStore {
    async fn find_groups_by_labels(&self, labels: &[String]) -> Result<Vec<Group>, DbError> {
        Self::check(&self.fail_group_lookup, "find_groups_by_labels")?;

        let wanted: std::collections::HashSet<String> =
            labels.iter().map(|l| crate::normalized_label(l)).collect();

        let inner = self.inner.lock().expect("store lock");
        Ok(inner
            .groups
            .iter()
            .filter(|g| wanted.contains(&crate::normalized_label(&g.label)))
            .cloned()
            .collect())
    }

    async fn create_groups(&self, labels: &[String]) -> Result<Vec<Group>, DbError> {
        Self::check(&self.fail_group_create, "create_groups")?;

        let mut inner = self.inner.lock().expect("store lock");
        let created: Vec<Group> = labels
            .iter()
            .map(|label| Group {
                id: uuid::Uuid::new_v4(),
                label: label.clone(),
                created_at: chrono::Utc::now(),
            })
            .collect();
        inner.groups.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_existing_boletas(&self, boletas: &[String]) -> Result<Vec<String>, DbError> {
        Self::check(&self.fail_boleta_lookup, "find_existing_boletas")?;

        let inner = self.inner.lock().expect("store lock");
        Ok(inner
            .students
            .iter()
            .filter(|s| boletas.contains(&s.boleta))
            .map(|s| s.boleta.clone())
            .collect())
    }

    async fn insert_students(&self, students: &[NewStudent]) -> Result<u64, DbError> {
        Self::check(&self.fail_insert, "insert_students")?;

        let mut inner = self.inner.lock().expect("store lock");

        // Unique constraint on boleta, all-or-nothing like the bulk INSERT.
        let mut seen: std::collections::HashSet<String> = inner
            .students
            .iter()
            .map(|s| s.boleta.clone())
            .collect();
        for draft in students {
            if !seen.insert(draft.boleta.clone()) {
                return Err(DbError::Unavailable(format!(
                    "unique violation: boleta '{}' already exists",
                    draft.boleta
                )));
            }
        }

        inner.students.extend(students.iter().cloned());
        Ok(students.len() as u64)
    }
}

#[async_trait]
impl RosterStore for PgRosterStore {
    async fn find_groups_by_labels(&self, labels: &[String]) -> Result<Vec<Group>, DbError> {
        Group::find_by_labels(&self.pool, labels)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn create_groups(&self, labels: &[String]) -> Result<Vec<Group>, DbError> {
        let groups = Group::create_many(&self.pool, labels)
            .await
            .map_err(DbError::QueryFailed)?;

        tracing::info!(count = groups.len(), "Created missing groups");
        Ok(groups)
    }

    async fn find_existing_boletas(&self, boletas: &[String]) -> Result<Vec<String>, DbError> {
        Student::find_existing_boletas(&self.pool, boletas)
            .await
            .map_err(DbError::QueryFailed)
    }

    async fn insert_students(&self, students: &[NewStudent]) -> Result<u64, DbError> {
        Student::insert_many(&self.pool, students)
            .await
            .map_err(DbError::QueryFailed)
    }
}
