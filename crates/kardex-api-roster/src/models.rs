//! Data types for the roster import pipeline.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Supported roster field delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Comma (,) - default delimiter
    #[default]
    Comma,
    /// Semicolon (;) - common in European exports
    Semicolon,
    /// Tab character (\t)
    Tab,
    /// Pipe character (|)
    Pipe,
}

impl Delimiter {
    /// Convert to the byte the csv reader splits on.
    #[must_use]
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
        }
    }

    /// Parse a delimiter from user input.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "," | "comma" => Ok(Delimiter::Comma),
            ";" | "semicolon" => Ok(Delimiter::Semicolon),
            "\t" | "tab" | "\\t" => Ok(Delimiter::Tab),
            "|" | "pipe" => Ok(Delimiter::Pipe),
            _ => Err(format!(
                "Invalid delimiter '{s}'. Valid values: ',', ';', '\\t', '|'"
            )),
        }
    }
}

/// A candidate student row produced by parsing the roster.
///
/// Immutable once produced. Fields the roster did not provide resolve to
/// the empty string; validity is decided later, per field, by the
/// deduplicator's preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    /// Given name (nombre).
    pub given_name: String,
    /// Paternal surname (apellido_paterno).
    pub paternal_surname: String,
    /// Maternal surname (apellido_materno).
    pub maternal_surname: String,
    /// Institutional ID (boleta).
    pub boleta: String,
    /// Group label (grupo), original casing.
    pub group_label: String,
    /// Email address (email/correo).
    pub email: String,
}

/// A dispatch instruction for one account invitation.
///
/// Ephemeral: produced by deduplication, consumed by the dispatcher after
/// the batch commits, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationRequest {
    pub email: String,
    pub boleta: String,
    pub group_id: Uuid,
}

/// Per-reason skip counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCounts {
    /// The boleta was already accepted earlier in the same batch.
    pub duplicate_in_batch: u32,
    /// The boleta already exists in the store.
    pub already_registered: u32,
    /// The group label had no entry in the reconciled mapping.
    pub unknown_group: u32,
}

impl SkippedCounts {
    /// Sum of all skip reasons.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.duplicate_in_batch + self.already_registered + self.unknown_group
    }
}

/// Final report for one roster import batch.
///
/// If `inserted_count > 0`, those students are durably stored regardless
/// of any invitation dispatch failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Candidate rows that survived parsing.
    pub total_rows: u32,
    /// Students inserted by the batch commit.
    pub inserted_count: u64,
    /// Rows skipped with a reason.
    pub skipped: SkippedCounts,
    /// Rows dropped for failing the precondition (empty name, boleta or group).
    pub dropped_rows: u32,
    /// Invitations dispatched successfully.
    pub invites_sent: u32,
    /// Invitations that failed to dispatch (logged, non-fatal).
    pub invites_failed: u32,
}
