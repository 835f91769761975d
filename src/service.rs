//! # service — One reminder cycle
//!
//! ```text
//! feed.recent_posts ─▶ parser (cutoff = now - lookback) ─▶ aggregate ─▶ format ─▶ dispatch
//! ```
//!
//! Either the full summary is sent or nothing is: a feed error, a malformed
//! timestamp or an overflowing total ends the cycle before the dispatcher is
//! touched.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{aggregate, PostParser, SummaryFormatter, SymbolNormalizer};
use crate::error::RunError;
use crate::feed::PostFeed;
use crate::models::Watchlist;
use crate::notify::Dispatcher;

/// What one successful cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub posts:    usize,
    pub records:  usize,
    pub failures: usize,
    pub watched:  usize,
    pub other:    usize,
    pub message:  String,
}

pub struct Reminder<F: PostFeed> {
    feed:       F,
    dispatcher: Dispatcher,
    account:    String,
    parser:     PostParser,
    watchlist:  Watchlist,
    lookback:   chrono::Duration,
    formatter:  SummaryFormatter,
}

impl<F: PostFeed> Reminder<F> {
    pub fn new(
        feed: F,
        dispatcher: Dispatcher,
        account: impl Into<String>,
        parser: PostParser,
        watchlist: Watchlist,
        lookback: chrono::Duration,
    ) -> Self {
        let account = account.into();
        let formatter = SummaryFormatter::new(&account, lookback);
        Self {
            feed,
            dispatcher,
            account,
            parser,
            watchlist,
            lookback,
            formatter,
        }
    }

    /// Wires the core from validated config.
    pub fn from_config(config: &Config, feed: F, dispatcher: Dispatcher) -> Self {
        let normalizer = SymbolNormalizer::with_overrides(config.symbol_overrides.iter().cloned());
        let mut parser = PostParser::new(normalizer);
        if config.parse_liquidations {
            parser = parser.with_liquidations();
        }

        Self::new(
            feed,
            dispatcher,
            config.account.clone(),
            parser,
            Watchlist::new(config.crypto_codes.iter().cloned()),
            config.lookback,
        )
    }

    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<CycleReport, RunError> {
        let cutoff = now
            .checked_sub_signed(self.lookback)
            .ok_or_else(|| RunError::Window {
                now:           now.to_rfc3339(),
                lookback_mins: self.lookback.num_minutes(),
            })?;

        let posts = self.feed.recent_posts(&self.account).await?;
        debug!(account = %self.account, posts = posts.len(), %cutoff, "Feed fetched");

        let report = self.parser.parse_posts(&posts, cutoff)?;

        for failure in &report.failures {
            warn!(reason = %failure.reason, text = %failure.text, "Failed to parse trade post");
        }
        for text in &report.unrecognized {
            debug!(text = %text, "Unrecognized post");
        }

        let summary = aggregate(&report.records, &self.watchlist)?;
        let message = self.formatter.format(&summary.watched, &summary.other);

        info!(
            posts    = posts.len(),
            stale    = report.stale,
            records  = report.records.len(),
            failures = report.failures.len(),
            watched  = summary.watched.len(),
            other    = summary.other.len(),
            "Summary built"
        );

        self.dispatcher.dispatch(&message).await?;

        Ok(CycleReport {
            posts:    posts.len(),
            records:  report.records.len(),
            failures: report.failures.len(),
            watched:  summary.watched.len(),
            other:    summary.other.len(),
            message,
        })
    }
}
