//! # models::post
//!
//! Defines [`RawPost`], one unit of text published by the monitored account
//! exactly as the feed collaborator hands it over.

/// A single post pulled from the feed.
///
/// `created_at` is kept in the feed's raw textual form. Validating it belongs
/// to the parser: a timestamp that cannot be read means the feed contract is
/// broken and the whole batch is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub text: String,

    /// RFC 3339 (`2024-03-01T10:00:00.000Z`) or the legacy
    /// `Mon Jan 02 15:04:05 -0700 2006` layout.
    pub created_at: String,
}

impl RawPost {
    pub fn new(text: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            text:       text.into(),
            created_at: created_at.into(),
        }
    }
}
