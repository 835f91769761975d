//! # notify — Deliver the rendered summary
//!
//! [`Notifier`] is the delivery seam; the core never sees whether delivery
//! worked. Two transports:
//! * [`SlackNotifier`] — JSON `{"text": ...}` POST to an incoming webhook.
//! * [`SmsNotifier`]   — Twilio Messages API, one SMS per phone number.
//!
//! [`Dispatcher`] fans one message out to every configured destination.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

use crate::error::NotifyError;

/// Where a message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Webhook(String),
    /// E.164 phone number, e.g. `+61400000000`.
    Phone(String),
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Webhook(url) => write!(f, "webhook {url}"),
            Destination::Phone(number) => write!(f, "phone {number}"),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, message: &str, destination: &Destination) -> Result<(), NotifyError>;
}

async fn ensure_success(
    resp: reqwest::Response,
    destination: &Destination,
) -> Result<(), NotifyError> {
    if resp.status().is_success() {
        return Ok(());
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(NotifyError::Rejected {
        destination: destination.to_string(),
        status,
        body,
    })
}

// ─── Slack ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WebhookBody<'a> {
    text: &'a str,
}

pub struct SlackNotifier {
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    fn name(&self) -> &'static str {
        "slack"
    }

    async fn send(&self, message: &str, destination: &Destination) -> Result<(), NotifyError> {
        let Destination::Webhook(url) = destination else {
            return Err(NotifyError::Unsupported {
                notifier:    self.name(),
                destination: destination.to_string(),
            });
        };

        let resp = self
            .client
            .post(url)
            .json(&WebhookBody { text: message })
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        ensure_success(resp, destination).await
    }
}

// ─── Twilio SMS ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token:  String,
    /// Sender number registered with Twilio.
    pub from_number: String,
}

pub struct SmsNotifier {
    client:      reqwest::Client,
    base_url:    String,
    credentials: TwilioCredentials,
}

impl SmsNotifier {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.twilio.com";

    pub fn new(client: reqwest::Client, credentials: TwilioCredentials) -> Self {
        Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            credentials,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl Notifier for SmsNotifier {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn send(&self, message: &str, destination: &Destination) -> Result<(), NotifyError> {
        let Destination::Phone(number) = destination else {
            return Err(NotifyError::Unsupported {
                notifier:    self.name(),
                destination: destination.to_string(),
            });
        };

        let form = [
            ("To", number.as_str()),
            ("From", self.credentials.from_number.as_str()),
            ("Body", message),
        ];

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&form)
            .timeout(Duration::from_secs(10))
            .send()
            .await?;

        ensure_success(resp, destination).await
    }
}

// ─── Dispatcher ───────────────────────────────────────────────────────────────

/// Configured `(notifier, destination)` routes.
#[derive(Default, Clone)]
pub struct Dispatcher {
    routes: Vec<(Arc<dyn Notifier>, Destination)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, notifier: Arc<dyn Notifier>, destination: Destination) -> Self {
        self.routes.push((notifier, destination));
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Sends `message` to every route in order; stops at the first failure.
    pub async fn dispatch(&self, message: &str) -> Result<(), NotifyError> {
        for (notifier, destination) in &self.routes {
            notifier.send(message, destination).await?;
            info!(notifier = notifier.name(), destination = %destination, "Summary delivered");
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every delivery; optionally rejects all of them.
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub sent: Mutex<Vec<(String, Destination)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn send(&self, message: &str, destination: &Destination) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Rejected {
                    destination: destination.to_string(),
                    status:      500,
                    body:        "boom".to_string(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((message.to_string(), destination.clone()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_dispatch_reaches_every_route() {
        let recorder = Arc::new(RecordingNotifier::default());
        let dispatcher = Dispatcher::new()
            .route(recorder.clone(), Destination::Webhook("https://hooks.example/1".into()))
            .route(recorder.clone(), Destination::Phone("+61400000000".into()));

        dispatcher.dispatch("hello").await.unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1], ("hello".to_string(), Destination::Phone("+61400000000".into())));
    }

    #[tokio::test]
    async fn test_dispatch_stops_at_first_failure() {
        let failing = Arc::new(RecordingNotifier { fail: true, ..Default::default() });
        let recorder = Arc::new(RecordingNotifier::default());
        let dispatcher = Dispatcher::new()
            .route(failing, Destination::Webhook("https://hooks.example/1".into()))
            .route(recorder.clone(), Destination::Webhook("https://hooks.example/2".into()));

        let err = dispatcher.dispatch("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Rejected { status: 500, .. }));
        assert!(recorder.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_slack_rejects_phone_destination() {
        let slack = SlackNotifier::new(reqwest::Client::new());
        let err = slack
            .send("hello", &Destination::Phone("+61400000000".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::Unsupported { notifier: "slack", .. }));
    }

    #[test]
    fn test_twilio_messages_url() {
        let sms = SmsNotifier::new(
            reqwest::Client::new(),
            TwilioCredentials {
                account_sid: "AC123".into(),
                auth_token:  "secret".into(),
                from_number: "+15005550006".into(),
            },
        );
        assert_eq!(
            sms.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages.json"
        );
    }
}
