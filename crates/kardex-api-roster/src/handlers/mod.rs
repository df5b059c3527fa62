//! HTTP handlers for roster import.

pub mod roster;
