//! Storage Adapters
//!
//! Implementations of the InforequestRepository port.
//!
//! - **FileInforequestRepository** - one YAML document per inforequest on disk
//! - **InMemoryInforequestRepository** - JSON documents in memory (testing/development)

mod file_inforequest_repository;
mod in_memory_inforequest_repository;

pub use file_inforequest_repository::FileInforequestRepository;
pub use in_memory_inforequest_repository::InMemoryInforequestRepository;
