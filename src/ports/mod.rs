//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `InforequestRepository` - aggregate persistence with optimistic versioning
//! - `MessageTransport` - hand-off of outbound email
//! - `IdentityProvider` - applicant and obligee contact lookup

mod identity_provider;
mod inforequest_repository;
mod message_transport;

pub use identity_provider::IdentityProvider;
pub use inforequest_repository::InforequestRepository;
pub use message_transport::{MessageTransport, OutboundEmail, TransportError};
