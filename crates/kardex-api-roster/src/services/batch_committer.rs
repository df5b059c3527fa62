//! Batch committer.
//!
//! Persists the insertable drafts in one durable, all-or-nothing
//! operation. The underlying bulk insert is a single statement, so there
//! is no partial-success reporting: it either stores every draft or none.

use kardex_db::{NewStudent, RosterStore};

use crate::error::RosterImportError;

/// Outcome of committing one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every row was skipped; the write was not attempted. A no-op, not
    /// a failure.
    NothingToInsert,
    /// The bulk insert succeeded with this many rows.
    Inserted(u64),
}

/// Commit the drafts, returning the inserted count.
///
/// # Errors
///
/// `CommitFailed` on any store error, including a boleta uniqueness
/// violation the dedup pass missed due to a concurrent batch.
pub async fn commit_students(
    store: &dyn RosterStore,
    drafts: &[NewStudent],
) -> Result<CommitOutcome, RosterImportError> {
    if drafts.is_empty() {
        tracing::info!("No insertable rows; skipping batch commit");
        return Ok(CommitOutcome::NothingToInsert);
    }

    let inserted = store
        .insert_students(drafts)
        .await
        .map_err(RosterImportError::CommitFailed)?;

    tracing::info!(inserted, "Batch committed");
    Ok(CommitOutcome::Inserted(inserted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kardex_db::{MemoryRosterStore, NewStudent};
    use uuid::Uuid;

    fn draft(boleta: &str) -> NewStudent {
        NewStudent::from_roster_fields("Ana", "", "", boleta, Uuid::new_v4())
    }

    #[tokio::test]
    async fn test_empty_batch_skips_the_write() {
        let store = MemoryRosterStore::new();
        store.fail_insert(true); // would fail if the write were attempted

        let outcome = commit_students(&store, &[]).await.unwrap();
        assert_eq!(outcome, CommitOutcome::NothingToInsert);
    }

    #[tokio::test]
    async fn test_commit_reports_inserted_count() {
        let store = MemoryRosterStore::new();

        let outcome = commit_students(&store, &[draft("B001"), draft("B002")])
            .await
            .unwrap();

        assert_eq!(outcome, CommitOutcome::Inserted(2));
        assert_eq!(store.students().len(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        let store = MemoryRosterStore::new();
        store.fail_insert(true);

        let err = commit_students(&store, &[draft("B001")]).await.unwrap_err();
        assert!(matches!(err, RosterImportError::CommitFailed(_)));
        assert!(store.students().is_empty());
    }
}
