//! Group entity model.
//!
//! A group is a cohort/classroom that students belong to. Groups are
//! identified by their label (e.g. "3IM13"), compared after normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A student group (cohort/classroom).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier, assigned by the store on creation.
    pub id: Uuid,

    /// Display label, natural key. Original casing is preserved.
    pub label: String,

    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

/// Normalize a group label for comparison: trimmed and lowercased.
///
/// Creation keeps the original casing; only lookups and map keys use the
/// normalized form.
#[must_use]
pub fn normalized_label(label: &str) -> String {
    label.trim().to_lowercase()
}

impl Group {
    /// Fetch groups whose normalized label matches any of the given labels.
    ///
    /// `labels` may carry arbitrary casing/whitespace; matching happens on
    /// the normalized form on both sides.
    pub async fn find_by_labels(
        pool: &sqlx::PgPool,
        labels: &[String],
    ) -> Result<Vec<Group>, sqlx::Error> {
        let normalized: Vec<String> = labels.iter().map(|l| normalized_label(l)).collect();

        sqlx::query_as(
            r"
            SELECT id, label, created_at
            FROM groups
            WHERE lower(trim(label)) = ANY($1)
            ",
        )
        .bind(&normalized)
        .fetch_all(pool)
        .await
    }

    /// Bulk-create one group per label, returning the created rows.
    ///
    /// Labels are inserted with their original casing. No uniqueness is
    /// enforced on labels; two concurrent batches can both create a group
    /// for the same missing label.
    pub async fn create_many(
        pool: &sqlx::PgPool,
        labels: &[String],
    ) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as(
            r"
            INSERT INTO groups (label)
            SELECT * FROM UNNEST($1::text[])
            RETURNING id, label, created_at
            ",
        )
        .bind(labels)
        .fetch_all(pool)
        .await
    }
}
