//! Error types for the roster import pipeline and its HTTP surface.
//!
//! Fatal pipeline errors abort the batch and surface to the caller as RFC
//! 7807 Problem Details; non-fatal conditions accumulate into the
//! `BatchReport` instead.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kardex_db::DbError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL for error type URIs.
const ERROR_BASE_URL: &str = "https://kardex.app/errors/roster";

/// RFC 7807 Problem Details structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// Short human-readable summary.
    pub title: String,

    /// HTTP status code.
    pub status: u16,

    /// Human-readable explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ProblemDetails {
    /// Create a new `ProblemDetails` instance.
    #[must_use]
    pub fn new(error_type: &str, title: &str, status: StatusCode) -> Self {
        Self {
            error_type: format!("{ERROR_BASE_URL}/{error_type}"),
            title: title.to_string(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Roster import errors.
///
/// The fatal pipeline kinds carry the stage they abort from in their name;
/// `Reconciling` and `Committing` are the only stages that can fail the
/// batch.
#[derive(Debug, Error)]
pub enum RosterImportError {
    /// The roster referenced no group labels at all.
    #[error("No group labels found in the roster")]
    NoGroupsSpecified,

    /// Datastore failure while reconciling groups or the existing-boleta set.
    #[error("Reconciliation failed: {0}")]
    ReconcileFailed(#[source] DbError),

    /// Group creation completed without covering every requested label.
    #[error("Reconciliation left {0} group label(s) unresolved")]
    ReconcileIncomplete(usize),

    /// Datastore failure or constraint violation during the bulk insert.
    /// No rows from this batch are committed.
    #[error("Batch commit failed: {0}")]
    CommitFailed(#[source] DbError),

    /// The uploaded file or its parameters were unusable.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterImportError {
    /// Pipeline stage this error aborts from, for logging.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            RosterImportError::NoGroupsSpecified
            | RosterImportError::ReconcileFailed(_)
            | RosterImportError::ReconcileIncomplete(_) => "reconciling",
            RosterImportError::CommitFailed(_) => "committing",
            RosterImportError::InvalidUpload(_) | RosterImportError::Internal(_) => "parsing",
        }
    }

    /// Get the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            RosterImportError::NoGroupsSpecified | RosterImportError::InvalidUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            RosterImportError::CommitFailed(db) if db.is_unique_violation() => {
                StatusCode::CONFLICT
            }
            RosterImportError::ReconcileFailed(_)
            | RosterImportError::ReconcileIncomplete(_)
            | RosterImportError::CommitFailed(_)
            | RosterImportError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to `ProblemDetails`.
    #[must_use]
    pub fn to_problem_details(&self) -> ProblemDetails {
        match self {
            RosterImportError::NoGroupsSpecified => ProblemDetails::new(
                "no-groups-specified",
                "No Groups Specified",
                StatusCode::BAD_REQUEST,
            )
            .with_detail("The roster contains no group labels; nothing was written."),

            RosterImportError::InvalidUpload(msg) => {
                ProblemDetails::new("invalid-upload", "Invalid Upload", StatusCode::BAD_REQUEST)
                    .with_detail(msg.clone())
            }

            RosterImportError::CommitFailed(db) if db.is_unique_violation() => {
                tracing::error!(error = %db, "Boleta conflict during batch commit");
                ProblemDetails::new(
                    "boleta-conflict",
                    "Boleta Conflict",
                    StatusCode::CONFLICT,
                )
                .with_detail(
                    "A concurrent import registered one of these boletas first. \
                     No rows from this batch were committed; retry the upload.",
                )
            }

            RosterImportError::ReconcileFailed(db) => {
                tracing::error!(error = %db, "Datastore error during reconciliation");
                ProblemDetails::new(
                    "reconcile-failed",
                    "Reconciliation Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("A datastore error occurred before any rows were written.")
            }

            RosterImportError::ReconcileIncomplete(count) => {
                tracing::error!(unresolved = count, "Group creation left labels unresolved");
                ProblemDetails::new(
                    "reconcile-failed",
                    "Reconciliation Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("Group creation did not cover every requested label.")
            }

            RosterImportError::CommitFailed(db) => {
                tracing::error!(error = %db, "Datastore error during batch commit");
                ProblemDetails::new(
                    "commit-failed",
                    "Commit Failed",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("The bulk insert failed; no rows from this batch were committed.")
            }

            RosterImportError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal roster import error");
                ProblemDetails::new(
                    "internal-error",
                    "Internal Server Error",
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .with_detail("An internal error occurred. Please try again later.")
            }
        }
    }
}

impl IntoResponse for RosterImportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let problem = self.to_problem_details();

        let mut response = (status, Json(problem)).into_response();
        response.headers_mut().insert(
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_groups_is_bad_request() {
        let err = RosterImportError::NoGroupsSpecified;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.stage(), "reconciling");
    }

    #[test]
    fn test_commit_failure_is_internal_error() {
        let err =
            RosterImportError::CommitFailed(DbError::Unavailable("down".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.stage(), "committing");
    }

    #[test]
    fn test_problem_details_type_uri() {
        let problem = RosterImportError::NoGroupsSpecified.to_problem_details();
        assert_eq!(
            problem.error_type,
            "https://kardex.app/errors/roster/no-groups-specified"
        );
        assert_eq!(problem.status, 400);
    }
}
