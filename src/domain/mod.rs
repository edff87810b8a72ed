//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `calendar` - Holiday tables and workday arithmetic
//! - `deadline` - The deadline value object
//! - `inforequest` - The inforequest aggregate, its branches, actions and mail

pub mod calendar;
pub mod deadline;
pub mod foundation;
pub mod inforequest;
