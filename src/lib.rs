//! Inforequests - freedom-of-information request lifecycle and deadline engine
//!
//! This crate tracks requests for information sent to public authorities:
//! the tree of legal actions each request accumulates, the statutory
//! deadlines those actions impose, and the scheduled jobs that remind
//! applicants and close requests nobody answers any more.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
