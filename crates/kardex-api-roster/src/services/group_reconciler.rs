//! Group reconciler.
//!
//! Resolves the group labels referenced by a batch against the store,
//! creating the missing groups, and produces the normalized-label to
//! group-id mapping the deduplicator finishes rows with. Runs to
//! completion before any student row is finalized, so every accepted
//! draft references a group that exists at commit time.

use std::collections::{HashMap, HashSet};

use kardex_db::{normalized_label, RosterStore};
use uuid::Uuid;

use crate::error::RosterImportError;
use crate::models::CandidateRow;

/// Reconcile the batch's group labels against the store.
///
/// Returns a mapping from normalized label to group id covering both
/// pre-existing and newly created groups.
///
/// # Errors
///
/// - `NoGroupsSpecified` when the batch references no group label at all;
///   the pipeline halts before any write.
/// - `ReconcileFailed` on any store failure; partial group creation is
///   never treated as success.
pub async fn reconcile_groups(
    store: &dyn RosterStore,
    rows: &[CandidateRow],
) -> Result<HashMap<String, Uuid>, RosterImportError> {
    // Distinct labels, first-seen casing preserved for creation.
    let mut seen: HashSet<String> = HashSet::new();
    let mut requested: Vec<String> = Vec::new();
    for row in rows {
        let label = row.group_label.trim();
        if label.is_empty() {
            continue;
        }
        if seen.insert(normalized_label(label)) {
            requested.push(label.to_string());
        }
    }

    if requested.is_empty() {
        return Err(RosterImportError::NoGroupsSpecified);
    }

    let existing = store
        .find_groups_by_labels(&requested)
        .await
        .map_err(RosterImportError::ReconcileFailed)?;

    let mut mapping: HashMap<String, Uuid> = existing
        .iter()
        .map(|g| (normalized_label(&g.label), g.id))
        .collect();

    let missing: Vec<String> = requested
        .iter()
        .filter(|label| !mapping.contains_key(&normalized_label(label)))
        .cloned()
        .collect();

    if !missing.is_empty() {
        let created = store
            .create_groups(&missing)
            .await
            .map_err(RosterImportError::ReconcileFailed)?;

        for group in &created {
            mapping.insert(normalized_label(&group.label), group.id);
        }
    }

    let unresolved = requested
        .iter()
        .filter(|label| !mapping.contains_key(&normalized_label(label)))
        .count();
    if unresolved > 0 {
        return Err(RosterImportError::ReconcileIncomplete(unresolved));
    }

    tracing::info!(
        requested = requested.len(),
        existing = existing.len(),
        created = missing.len(),
        "Groups reconciled"
    );

    Ok(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kardex_db::MemoryRosterStore;

    fn row(group_label: &str) -> CandidateRow {
        CandidateRow {
            given_name: "Ana".to_string(),
            paternal_surname: String::new(),
            maternal_surname: String::new(),
            boleta: "B001".to_string(),
            group_label: group_label.to_string(),
            email: String::new(),
        }
    }

    #[tokio::test]
    async fn test_creates_missing_groups_once() {
        let store = MemoryRosterStore::new();
        let rows: Vec<CandidateRow> = (0..50).map(|_| row("9IM4")).collect();

        let mapping = reconcile_groups(&store, &rows).await.unwrap();

        assert_eq!(mapping.len(), 1);
        let groups = store.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "9IM4");
        assert_eq!(mapping[&normalized_label("9IM4")], groups[0].id);
    }

    #[tokio::test]
    async fn test_reuses_existing_groups_case_insensitively() {
        let store = MemoryRosterStore::new();
        let pre = store
            .create_groups(&["3IM13".to_string()])
            .await
            .unwrap()
            .remove(0);

        let mapping = reconcile_groups(&store, &[row(" 3im13 "), row("5BM1")])
            .await
            .unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping[&normalized_label("3IM13")], pre.id);
        assert_eq!(store.groups().len(), 2);
    }

    #[tokio::test]
    async fn test_preserves_first_seen_casing_on_creation() {
        let store = MemoryRosterStore::new();

        reconcile_groups(&store, &[row("3Im13"), row("3IM13"), row("3im13")])
            .await
            .unwrap();

        let groups = store.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "3Im13");
    }

    #[tokio::test]
    async fn test_no_labels_is_fatal_before_any_write() {
        let store = MemoryRosterStore::new();

        let err = reconcile_groups(&store, &[row(""), row("   ")])
            .await
            .unwrap_err();

        assert!(matches!(err, RosterImportError::NoGroupsSpecified));
        assert!(store.groups().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = MemoryRosterStore::new();
        store.fail_group_lookup(true);

        let err = reconcile_groups(&store, &[row("3IM13")]).await.unwrap_err();

        assert!(matches!(err, RosterImportError::ReconcileFailed(_)));
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let store = MemoryRosterStore::new();
        store.fail_group_create(true);

        let err = reconcile_groups(&store, &[row("3IM13")]).await.unwrap_err();

        assert!(matches!(err, RosterImportError::ReconcileFailed(_)));
    }
}
