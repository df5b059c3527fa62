//! Datastore layer for kardex.
//!
//! Provides the entity models (groups, students), the `RosterStore`
//! boundary trait consumed by the roster import pipeline, its Postgres
//! implementation, and embedded migrations.

pub mod error;
pub mod migrations;
pub mod models;
pub mod store;

pub use error::DbError;
pub use migrations::run_migrations;
pub use models::{normalized_label, Group, NewStudent, Student, STUDENT_ROLE_TAG};
pub use store::{MemoryRosterStore, PgRosterStore, RosterStore};
