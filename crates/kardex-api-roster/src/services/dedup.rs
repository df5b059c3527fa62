//! Student deduplicator.
//!
//! Partitions candidate rows into insertable drafts and skipped rows, in
//! input order: the first occurrence of a boleta wins. The partition is
//! exhaustive and disjoint — every candidate row lands in exactly one of
//! accepted, duplicate-in-batch, already-registered, unknown-group, or
//! dropped-precondition.

use std::collections::{HashMap, HashSet};

use kardex_db::{normalized_label, NewStudent, RosterStore};
use uuid::Uuid;

use crate::error::RosterImportError;
use crate::models::{CandidateRow, InvitationRequest, SkippedCounts};

/// Result of partitioning one batch.
#[derive(Debug, Default)]
pub struct DedupOutcome {
    /// Drafts ready for the batch committer.
    pub drafts: Vec<NewStudent>,
    /// Invitation requests for accepted rows that carry an email.
    pub invites: Vec<InvitationRequest>,
    /// Per-reason skip counters.
    pub skipped: SkippedCounts,
    /// Rows dropped for failing the precondition (empty name, boleta or group).
    pub dropped_rows: u32,
}

/// Partition candidate rows against the batch and the store.
///
/// `groups` is the reconciled label mapping; it must cover every label the
/// batch can resolve, which the reconciler guarantees before this runs.
///
/// # Errors
///
/// A store failure while fetching the existing boleta set is fatal and
/// reported as `ReconcileFailed`; no rows have been written at that point.
pub async fn partition_rows(
    store: &dyn RosterStore,
    rows: &[CandidateRow],
    groups: &HashMap<String, Uuid>,
) -> Result<DedupOutcome, RosterImportError> {
    // Boletas worth checking against the store: distinct, from rows that
    // could actually be inserted.
    let mut lookup_seen: HashSet<String> = HashSet::new();
    let mut lookup: Vec<String> = Vec::new();
    for row in rows {
        let boleta = row.boleta.trim();
        if boleta.is_empty() || row.given_name.trim().is_empty() {
            continue;
        }
        if !groups.contains_key(&normalized_label(&row.group_label)) {
            continue;
        }
        if lookup_seen.insert(boleta.to_string()) {
            lookup.push(boleta.to_string());
        }
    }

    let registered: HashSet<String> = if lookup.is_empty() {
        HashSet::new()
    } else {
        store
            .find_existing_boletas(&lookup)
            .await
            .map_err(RosterImportError::ReconcileFailed)?
            .into_iter()
            .collect()
    };

    let mut outcome = DedupOutcome::default();
    let mut used: HashSet<String> = HashSet::new();

    for row in rows {
        let given_name = row.given_name.trim();
        let boleta = row.boleta.trim();
        let group_label = row.group_label.trim();

        if given_name.is_empty() || boleta.is_empty() || group_label.is_empty() {
            outcome.dropped_rows += 1;
            continue;
        }

        if used.contains(boleta) {
            outcome.skipped.duplicate_in_batch += 1;
            continue;
        }

        if registered.contains(boleta) {
            outcome.skipped.already_registered += 1;
            continue;
        }

        let Some(&group_id) = groups.get(&normalized_label(group_label)) else {
            outcome.skipped.unknown_group += 1;
            continue;
        };

        used.insert(boleta.to_string());
        outcome.drafts.push(NewStudent::from_roster_fields(
            given_name,
            &row.paternal_surname,
            &row.maternal_surname,
            boleta,
            group_id,
        ));

        let email = row.email.trim();
        if !email.is_empty() {
            outcome.invites.push(InvitationRequest {
                email: email.to_string(),
                boleta: boleta.to_string(),
                group_id,
            });
        }
    }

    tracing::debug!(
        accepted = outcome.drafts.len(),
        duplicate_in_batch = outcome.skipped.duplicate_in_batch,
        already_registered = outcome.skipped.already_registered,
        unknown_group = outcome.skipped.unknown_group,
        dropped = outcome.dropped_rows,
        "Batch partitioned"
    );

    Ok(outcome)
}
