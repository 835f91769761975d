//! # whaleremind — Whale Trades Reminder
//!
//! ## Flow
//! ```text
//! every RUN_INTERVAL_SECS (or once):
//!   1. Fetch recent posts of FEED_ACCOUNT
//!   2. Parse trade posts newer than now - LOOKBACK_MINS
//!   3. Net exposure per symbol: CRYPTO_CODES vs others
//!   4. Send the summary to Slack / SMS
//! ```
//!
//! ## Environment Variables
//!
//! | Variable               | Default              | Description                          |
//! |------------------------|----------------------|--------------------------------------|
//! | `TWITTER_BEARER_TOKEN` | —                    | Feed API bearer token                |
//! | `CRYPTO_CODES`         | —                    | Watched symbols, e.g. `$BTC,$ETH`    |
//! | `SLACK_WEBHOOK_URL`    | —                    | Slack incoming webhook               |
//! | `SMS_PHONE_NUMBERS`    | —                    | SMS recipients (needs `TWILIO_*`)    |
//! | `LOOKBACK_MINS`        | `120`                | Trailing window                      |
//! | `RUN_INTERVAL_SECS`    | unset (run once)     | Loop period                          |
//! | `RUST_LOG`             | `whaleremind=info`   | Tracing filter                       |

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use tracing::{error, info, info_span, Instrument};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use whaleremind::feed::TwitterFeed;
use whaleremind::notify::{Destination, Dispatcher, SlackNotifier, SmsNotifier};
use whaleremind::{Config, Reminder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env()
            .add_directive("whaleremind=info".parse()?)
            .add_directive("reqwest=warn".parse()?))
        .init();

    let config = Config::from_env().context("Failed to load config")?;

    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()
        .context("Failed to build HTTP client")?;

    let feed = TwitterFeed::new(
        client.clone(),
        config.feed_url.clone(),
        config.bearer_token.clone(),
        config.max_results,
    );
    let dispatcher = build_dispatcher(&config, &client);
    let reminder = Reminder::from_config(&config, feed, dispatcher);

    info!(
        account      = %config.account,
        watchlist    = ?config.crypto_codes,
        lookback_min = config.lookback.num_minutes(),
        interval     = ?config.run_interval,
        "whaleremind started"
    );

    let Some(interval) = config.run_interval else {
        return run_once(&reminder).await;
    };

    loop {
        if let Err(e) = run_once(&reminder).await {
            error!(error = %e, "Cycle failed — will run again next interval");
        }
        info!(interval = ?interval, "Sleeping until next cycle...");
        tokio::time::sleep(interval).await;
    }
}

async fn run_once(reminder: &Reminder<TwitterFeed>) -> anyhow::Result<()> {
    let span = info_span!("cycle", run_id = %uuid::Uuid::new_v4());

    async {
        let report = reminder.run_cycle(Utc::now()).await?;
        info!(
            records  = report.records,
            failures = report.failures,
            watched  = report.watched,
            other    = report.other,
            "Summary sent"
        );
        Ok::<(), anyhow::Error>(())
    }
    .instrument(span)
    .await
}

fn build_dispatcher(config: &Config, client: &reqwest::Client) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();

    if let Some(url) = &config.slack_webhook_url {
        let slack = Arc::new(SlackNotifier::new(client.clone()));
        dispatcher = dispatcher.route(slack, Destination::Webhook(url.clone()));
    }

    if let Some(credentials) = &config.twilio {
        let sms = Arc::new(SmsNotifier::new(client.clone(), credentials.clone()));
        for number in &config.sms_phone_numbers {
            dispatcher = dispatcher.route(sms.clone(), Destination::Phone(number.clone()));
        }
    }

    dispatcher
}
