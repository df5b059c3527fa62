//! Database entity models.

pub mod group;
pub mod student;

pub use group::{normalized_label, Group};
pub use student::{NewStudent, Student, STUDENT_ROLE_TAG};
