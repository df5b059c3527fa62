//! Student entity model.
//!
//! Students are created only through the roster batch committer; this
//! subsystem never updates or deletes them. The boleta (institutional ID)
//! is the natural key and is unique across the whole store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Role tag assigned to every student created through roster import.
pub const STUDENT_ROLE_TAG: &str = "student";

/// A registered student.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier, assigned by the store on creation.
    pub id: Uuid,

    /// Given name (nombre).
    pub given_name: String,

    /// Paternal surname (apellido paterno).
    pub paternal_surname: Option<String>,

    /// Maternal surname (apellido materno).
    pub maternal_surname: Option<String>,

    /// Institutional ID (boleta). Unique across the store.
    pub boleta: String,

    /// The group this student belongs to.
    pub group_id: Uuid,

    /// Role tag for downstream account linking.
    pub role_tag: String,

    /// When the student was created.
    pub created_at: DateTime<Utc>,
}

/// A student draft produced by deduplication, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    pub given_name: String,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub boleta: String,
    pub group_id: Uuid,
    pub role_tag: String,
}

impl Student {
    /// Fetch the subset of the given boletas that already exist in the store.
    pub async fn find_existing_boletas(
        pool: &sqlx::PgPool,
        boletas: &[String],
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r"
            SELECT boleta FROM students
            WHERE boleta = ANY($1)
            ",
        )
        .bind(boletas)
        .fetch_all(pool)
        .await
    }

    /// Insert student drafts in one bulk statement, returning the row count.
    ///
    /// A single multi-row INSERT is atomic: either every draft is stored or
    /// none is. A unique violation on `boleta` (check-then-act race with a
    /// concurrent batch) fails the whole statement.
    pub async fn insert_many(
        pool: &sqlx::PgPool,
        students: &[NewStudent],
    ) -> Result<u64, sqlx::Error> {
        let given_names: Vec<&str> = students.iter().map(|s| s.given_name.as_str()).collect();
        let paternal: Vec<Option<&str>> = students
            .iter()
            .map(|s| s.paternal_surname.as_deref())
            .collect();
        let maternal: Vec<Option<&str>> = students
            .iter()
            .map(|s| s.maternal_surname.as_deref())
            .collect();
        let boletas: Vec<&str> = students.iter().map(|s| s.boleta.as_str()).collect();
        let group_ids: Vec<Uuid> = students.iter().map(|s| s.group_id).collect();
        let role_tags: Vec<&str> = students.iter().map(|s| s.role_tag.as_str()).collect();

        let result = sqlx::query(
            r"
            INSERT INTO students
                (given_name, paternal_surname, maternal_surname, boleta, group_id, role_tag)
            SELECT * FROM UNNEST(
                $1::text[], $2::text[], $3::text[], $4::text[], $5::uuid[], $6::text[]
            )
            ",
        )
        .bind(&given_names)
        .bind(&paternal)
        .bind(&maternal)
        .bind(&boletas)
        .bind(&group_ids)
        .bind(&role_tags)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}

impl NewStudent {
    /// Build a draft from roster fields, mapping empty surnames to NULL.
    #[must_use]
    pub fn from_roster_fields(
        given_name: &str,
        paternal_surname: &str,
        maternal_surname: &str,
        boleta: &str,
        group_id: Uuid,
    ) -> Self {
        let opt = |s: &str| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        Self {
            given_name: given_name.trim().to_string(),
            paternal_surname: opt(paternal_surname),
            maternal_surname: opt(maternal_surname),
            boleta: boleta.trim().to_string(),
            group_id,
            role_tag: STUDENT_ROLE_TAG.to_string(),
        }
    }
}
