//! Roster import pipeline.
//!
//! The single entry point for one batch: parse the roster text, reconcile
//! groups, deduplicate students, commit the insertable rows, then dispatch
//! invitations for what was actually committed. Stages run sequentially;
//! each one's output feeds the next.

use kardex_db::RosterStore;

use crate::error::RosterImportError;
use crate::invite::InviteSender;
use crate::models::{BatchReport, CandidateRow, Delimiter};
use crate::services::batch_committer::{self, CommitOutcome};
use crate::services::invitation_dispatcher;
use crate::services::{dedup, group_reconciler, row_parser};

/// Import one roster batch.
///
/// Returns the batch report on success. A roster with no usable rows is
/// not an error: the report comes back all-zero and nothing is written.
/// Once the report shows `inserted_count > 0`, those students are durably
/// stored regardless of any invitation dispatch failures.
///
/// # Errors
///
/// Fatal conditions abort the batch: `NoGroupsSpecified` before any
/// write, `ReconcileFailed` on a datastore error while reconciling,
/// `CommitFailed` if the bulk insert fails (no rows committed).
pub async fn import_roster(
    store: &dyn RosterStore,
    invite_sender: &dyn InviteSender,
    raw_text: &str,
    delimiter: Delimiter,
) -> Result<BatchReport, RosterImportError> {
    let rows: Vec<CandidateRow> = row_parser::candidate_rows(raw_text, delimiter).collect();
    if rows.is_empty() {
        tracing::info!("Roster contains no usable rows");
        return Ok(BatchReport::default());
    }

    let total_rows = rows.len() as u32;
    tracing::info!(total_rows, "Roster parsed");

    let groups = group_reconciler::reconcile_groups(store, &rows).await?;

    let outcome = dedup::partition_rows(store, &rows, &groups).await?;

    let inserted_count = match batch_committer::commit_students(store, &outcome.drafts).await? {
        CommitOutcome::NothingToInsert => 0,
        CommitOutcome::Inserted(count) => count,
    };

    // Dispatch only after the commit confirmed success; an empty commit
    // leaves nothing to invite.
    let stats = if inserted_count > 0 {
        invitation_dispatcher::dispatch_invitations(invite_sender, &outcome.invites).await
    } else {
        invitation_dispatcher::DispatchStats::default()
    };

    let report = BatchReport {
        total_rows,
        inserted_count,
        skipped: outcome.skipped,
        dropped_rows: outcome.dropped_rows,
        invites_sent: stats.sent,
        invites_failed: stats.failed,
    };

    tracing::info!(
        inserted = report.inserted_count,
        duplicate_in_batch = report.skipped.duplicate_in_batch,
        already_registered = report.skipped.already_registered,
        unknown_group = report.skipped.unknown_group,
        dropped = report.dropped_rows,
        invites_sent = report.invites_sent,
        invites_failed = report.invites_failed,
        "Roster import finished"
    );

    Ok(report)
}
