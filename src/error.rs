//! # error
//!
//! Typed errors for every boundary of a reminder cycle.
//!
//! Per-post problems are *not* errors: they travel as [`PostFailure`]
//! diagnostics inside the parse report and never abort the batch. A
//! malformed timestamp, a feed failure or a delivery failure ends a cycle,
//! as do an overflowing net total and an unusable lookback window. All of
//! these end it before any message is sent.

use thiserror::Error;

// ─── Parse ────────────────────────────────────────────────────────────────────

/// Batch-fatal parse error: the feed handed over a post whose creation time
/// cannot be read at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed timestamp '{created_at}' on post: {text}")]
    MalformedTimestamp { created_at: String, text: String },
}

/// Why a single in-scope post was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    /// Text mentions a position but is not shaped `<amount> <symbol> <position>`.
    #[error("post does not match the trade pattern")]
    PatternMismatch,

    /// The amount token survived the pattern but is not a number once
    /// `$` and thousands separators are stripped.
    #[error("amount '{0}' is not numeric")]
    InvalidAmount(String),
}

/// Non-fatal per-post diagnostic carrying the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {text}")]
pub struct PostFailure {
    pub text:   String,
    pub reason: FailureReason,
}

// ─── Aggregate ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Net amount for {symbol} overflowed")]
    Overflow { symbol: String },
}

// ─── Collaborators ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response arrived but its body is not the expected payload.
    #[error("Feed payload decode failed: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Feed API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unknown account: {0}")]
    UnknownAccount(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Notification rejected by {destination}: HTTP {status}: {body}")]
    Rejected {
        destination: String,
        status:      u16,
        body:        String,
    },

    /// The notifier cannot deliver to this kind of destination.
    #[error("Unsupported destination for {notifier}: {destination}")]
    Unsupported {
        notifier:    &'static str,
        destination: String,
    },
}

// ─── Cycle ────────────────────────────────────────────────────────────────────

/// Anything that terminates one reminder cycle.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    /// `now - lookback` falls outside the representable time range.
    #[error("Lookback window of {lookback_mins} minutes cannot be applied to {now}")]
    Window { now: String, lookback_mins: i64 },

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}
