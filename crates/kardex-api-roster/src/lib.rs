//! Roster import for kardex.
//!
//! This crate ingests a delimited roster file describing students,
//! reconciles it against the relational store of groups and students,
//! inserts only the genuinely new records, and dispatches account
//! invitations to the newly created students.
//!
//! # Example
//!
//! ```rust,ignore
//! use kardex_api_roster::{roster_router, RosterState};
//! use axum::Router;
//!
//! let state = RosterState::new(store, invite_sender);
//! let app = Router::new().merge(roster_router(state));
//! ```

pub mod error;
pub mod handlers;
pub mod invite;
pub mod models;
pub mod router;
pub mod services;
pub mod validation;

// Re-export public API
pub use error::{ProblemDetails, RosterImportError};
pub use invite::{HttpInviteSender, InviteMetadata, InviteSender, LogInviteSender};
pub use models::{BatchReport, CandidateRow, Delimiter, InvitationRequest, SkippedCounts};
pub use router::{roster_router, RosterState};
pub use services::import_service::import_roster;
