//! Pipeline stages for roster import.

pub mod batch_committer;
pub mod dedup;
pub mod group_reconciler;
pub mod import_service;
pub mod invitation_dispatcher;
pub mod row_parser;
