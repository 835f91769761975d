//! # whaleremind
//!
//! Reads a whale-alert account's recent posts, extracts leveraged trades,
//! nets them per symbol over a trailing window and sends the summary to
//! Slack and/or SMS.
//!
//! [`engine`] holds the pure core; [`feed`] and [`notify`] are the two I/O
//! collaborators and [`service`] runs one cycle across all of them.

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod models;
pub mod notify;
pub mod service;

pub use config::Config;
pub use error::{AggregateError, FailureReason, ParseError, PostFailure, RunError};
pub use service::{CycleReport, Reminder};
