//! Cron Adapter
//!
//! Drives the scheduled jobs from wall-clock run-at times.

mod cron_runner;

pub use cron_runner::{due_slot, CronRunner, CronRunnerConfig};
