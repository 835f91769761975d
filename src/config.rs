//! # config — Process configuration from environment variables
//!
//! Everything is validated here, before the first cycle runs: an empty
//! watchlist, no delivery destination or a half-configured SMS gateway stop
//! the process at startup.

use std::time::Duration;

use anyhow::{bail, Context};

use crate::notify::{Destination, TwilioCredentials};

/// Longest accepted trailing window: one week.
pub const MAX_LOOKBACK_MINS: i64 = 7 * 24 * 60;

/// Everything one reminder process needs.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the feed API
    pub bearer_token:      String,
    /// Base URL of the feed API
    pub feed_url:          String,
    /// Screen name whose posts are summarised
    pub account:           String,
    pub max_results:       u32,
    /// Watched symbols in configured order, e.g. `["$BTC", "$ETH"]`
    pub crypto_codes:      Vec<String>,
    /// Trailing window; posts older than `now - lookback` are ignored
    pub lookback:          chrono::Duration,
    /// Extra `raw → canonical` symbol overrides
    pub symbol_overrides:  Vec<(String, String)>,
    pub parse_liquidations: bool,
    pub slack_webhook_url: Option<String>,
    pub sms_phone_numbers: Vec<String>,
    pub twilio:            Option<TwilioCredentials>,
    /// `None` → run one cycle and exit
    pub run_interval:      Option<Duration>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).with_context(|| format!("{key} environment variable is required"))
        };

        let bearer_token = require("TWITTER_BEARER_TOKEN")?;

        let crypto_codes = split_list(&require("CRYPTO_CODES")?);
        if crypto_codes.is_empty() {
            bail!("CRYPTO_CODES must list at least one symbol, e.g. '$BTC,$ETH'");
        }

        let lookback_mins: i64 = get("LOOKBACK_MINS")
            .unwrap_or_else(|| "120".to_string()) // default: 2 hours
            .trim()
            .parse()
            .context("LOOKBACK_MINS must be a number")?;
        if !(1..=MAX_LOOKBACK_MINS).contains(&lookback_mins) {
            bail!("LOOKBACK_MINS must be between 1 and {MAX_LOOKBACK_MINS}, got {lookback_mins}");
        }
        let lookback = chrono::Duration::try_minutes(lookback_mins)
            .with_context(|| format!("LOOKBACK_MINS {lookback_mins} is out of range"))?;

        let max_results: u32 = get("FEED_MAX_RESULTS")
            .unwrap_or_else(|| "100".to_string())
            .trim()
            .parse()
            .context("FEED_MAX_RESULTS must be a number")?;

        let symbol_overrides = match get("SYMBOL_OVERRIDES") {
            Some(raw) => parse_overrides(&raw)?,
            None => Vec::new(),
        };

        let parse_liquidations = match get("PARSE_LIQUIDATIONS") {
            Some(raw) => parse_bool(&raw).context("PARSE_LIQUIDATIONS must be true or false")?,
            None => false,
        };

        let run_interval = get("RUN_INTERVAL_SECS")
            .map(|raw| raw.trim().parse::<u64>())
            .transpose()
            .context("RUN_INTERVAL_SECS must be a number")?
            .map(Duration::from_secs);

        let slack_webhook_url = get("SLACK_WEBHOOK_URL");
        let sms_phone_numbers = get("SMS_PHONE_NUMBERS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let twilio = if sms_phone_numbers.is_empty() {
            None
        } else {
            Some(TwilioCredentials {
                account_sid: require("TWILIO_ACCOUNT_SID")?,
                auth_token:  require("TWILIO_AUTH_TOKEN")?,
                from_number: require("TWILIO_FROM_NUMBER")?,
            })
        };

        if slack_webhook_url.is_none() && sms_phone_numbers.is_empty() {
            bail!("No destination configured: set SLACK_WEBHOOK_URL and/or SMS_PHONE_NUMBERS");
        }

        Ok(Self {
            bearer_token,
            feed_url:     get("TWITTER_API_URL").unwrap_or_else(|| "https://api.twitter.com".to_string()),
            account:      get("FEED_ACCOUNT").unwrap_or_else(|| "WhaleTrades".to_string()),
            max_results,
            crypto_codes,
            lookback,
            symbol_overrides,
            parse_liquidations,
            slack_webhook_url,
            sms_phone_numbers,
            twilio,
            run_interval,
        })
    }

    /// Every configured destination, webhook first.
    pub fn destinations(&self) -> Vec<Destination> {
        self.slack_webhook_url
            .iter()
            .cloned()
            .map(Destination::Webhook)
            .chain(self.sms_phone_numbers.iter().cloned().map(Destination::Phone))
            .collect()
    }
}

/// Comma separated, trimmed, blanks dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `#bitcoin=$BTC,#ethereum=$ETH`
fn parse_overrides(raw: &str) -> anyhow::Result<Vec<(String, String)>> {
    split_list(raw)
        .into_iter()
        .map(|pair| {
            let (from, to) = pair
                .split_once('=')
                .with_context(|| format!("SYMBOL_OVERRIDES entry '{pair}' must look like raw=canonical"))?;
            let (from, to) = (from.trim(), to.trim());
            if from.is_empty() || to.is_empty() {
                bail!("SYMBOL_OVERRIDES entry '{pair}' has an empty side");
            }
            Ok((from.to_string(), to.to_string()))
        })
        .collect()
}

fn parse_bool(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}
