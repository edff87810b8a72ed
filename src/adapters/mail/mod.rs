//! Mail Transport Adapters
//!
//! - **LoggingTransport** - writes every message to the log instead of sending it
//! - **RecordingTransport** - keeps sent messages in memory (testing)

mod logging_transport;
mod recording_transport;

pub use logging_transport::LoggingTransport;
pub use recording_transport::RecordingTransport;
