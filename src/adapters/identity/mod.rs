//! Identity Adapters
//!
//! - **InMemoryDirectory** - applicants and obligees held in memory, optionally
//!   seeded from a YAML directory file

mod in_memory_directory;

pub use in_memory_directory::{DirectoryFile, InMemoryDirectory};
