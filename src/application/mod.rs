//! Application layer - command handlers and scheduled jobs.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod scheduler;

pub use handlers::InforequestError;
pub use scheduler::{JobContext, JobReport, JobServices, ScheduledJob};
