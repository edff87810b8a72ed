//! Inforequest command handlers.

mod add_action;
mod advance_inforequest;
mod delete_action;
mod publish_inforequest;
mod snooze_deadline;
mod submit_inforequest;

pub use add_action::{AddActionCommand, AddActionHandler, AddActionResult};
pub use advance_inforequest::{
    AdvanceInforequestCommand, AdvanceInforequestHandler, AdvanceInforequestResult,
};
pub(crate) use advance_inforequest::resolve_obligees;
pub use delete_action::{DeleteActionCommand, DeleteActionHandler, DeleteActionResult};
pub use publish_inforequest::{PublishInforequestCommand, PublishInforequestHandler};
pub use snooze_deadline::{SnoozeDeadlineCommand, SnoozeDeadlineHandler};
pub use submit_inforequest::{
    SubmitInforequestCommand, SubmitInforequestHandler, SubmitInforequestResult,
};
