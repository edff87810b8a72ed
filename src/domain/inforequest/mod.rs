//! Inforequest module - the request aggregate, its branches and actions.
//!
//! An Inforequest is submitted to one obligee and may be advanced to others,
//! forming a tree of branches. Each branch is a chronological list of legal
//! actions; the deadline each action imposes is derived from its type, the
//! branch history and the jurisdiction's terms.

mod action;
mod action_type;
mod aggregate;
mod branch;
mod correspondence;
mod parties;
mod policy;
pub mod reply_address;

pub use action::{Action, ActionDraft};
pub use action_type::{
    ActionRole, ActionType, DeadlineBase, DeadlineRule, DisclosureLevel, RefusalReason,
};
pub use aggregate::Inforequest;
pub use branch::Branch;
pub use correspondence::{
    EmailClassification, InforequestEmail, Mailbox, Message, MessageDirection,
};
pub use parties::{Applicant, ApplicantSnapshot, Obligee, ObligeeSnapshot};
pub use policy::{DeadlinePolicy, Jurisdiction};
pub use reply_address::ReplyAddressTemplate;
