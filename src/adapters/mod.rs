//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `storage` - inforequest persistence (YAML files, in-memory)
//! - `identity` - applicant and obligee directory
//! - `mail` - outbound email transports
//! - `cron` - the scheduler's run-at loop

pub mod cron;
pub mod identity;
pub mod mail;
pub mod storage;

pub use cron::{CronRunner, CronRunnerConfig};
pub use identity::InMemoryDirectory;
pub use mail::{LoggingTransport, RecordingTransport};
pub use storage::{FileInforequestRepository, InMemoryInforequestRepository};
