//! Correspondence handlers: inbound mail routing and classification.

mod decide_email;
mod mark_email;
mod receive_email;

pub use decide_email::{DecideEmailCommand, DecideEmailHandler, DecideEmailResult};
pub use mark_email::{MarkEmailCommand, MarkEmailHandler};
pub use receive_email::{ReceiveEmailCommand, ReceiveEmailHandler, ReceiveEmailResult};
