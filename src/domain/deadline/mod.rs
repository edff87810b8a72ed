//! Deadline module - legal terms and the arithmetic over them.

mod deadline;

pub use deadline::{Deadline, DeadlineRole, DeadlineTerm, DeadlineUnit};
