//! # feed — Recent posts of the monitored account
//!
//! [`PostFeed`] is the narrow seam the reminder cycle reads from.
//! [`TwitterFeed`] implements it against the Twitter v2 API:
//!
//! ```text
//! GET /2/users/by/username/{account}            → user id
//! GET /2/users/{id}/tweets?tweet.fields=created_at → RawPost[]
//! ```
//!
//! Ordering of the returned posts is not relied on downstream.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::FeedError;
use crate::models::RawPost;

#[async_trait]
pub trait PostFeed: Send + Sync {
    /// Most recent posts of `account`. Any error is fatal to the cycle.
    async fn recent_posts(&self, account: &str) -> Result<Vec<RawPost>, FeedError>;
}

// ─── Twitter v2 ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserLookupResponse {
    data: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    /// Absent when the account has no posts.
    #[serde(default)]
    data: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
struct Tweet {
    text:       String,
    created_at: String,
}

impl From<Tweet> for RawPost {
    fn from(tweet: Tweet) -> Self {
        RawPost::new(tweet.text, tweet.created_at)
    }
}

pub struct TwitterFeed {
    client:       reqwest::Client,
    base_url:     String,
    bearer_token: String,
    max_results:  u32,
}

impl TwitterFeed {
    /// The API accepts between 5 and 100 posts per page.
    pub const MIN_RESULTS: u32 = 5;
    pub const MAX_RESULTS: u32 = 100;

    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        max_results: u32,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
            max_results: max_results.clamp(Self::MIN_RESULTS, Self::MAX_RESULTS),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FeedError> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.bearer_token)
            .query(query)
            .timeout(Duration::from_secs(15))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Status { status, body });
        }

        resp.json().await.map_err(FeedError::Decode)
    }

    async fn user_id(&self, account: &str) -> Result<String, FeedError> {
        let url = format!("{}/2/users/by/username/{account}", self.base_url);
        let resp: UserLookupResponse = self.get_json(&url, &[]).await?;

        resp.data
            .map(|user| user.id)
            .ok_or_else(|| FeedError::UnknownAccount(account.to_string()))
    }
}

#[async_trait]
impl PostFeed for TwitterFeed {
    async fn recent_posts(&self, account: &str) -> Result<Vec<RawPost>, FeedError> {
        let user_id = self.user_id(account).await?;
        debug!(account, user_id = %user_id, "Resolved feed account");

        let url = format!("{}/2/users/{user_id}/tweets", self.base_url);
        let query = [
            ("max_results", self.max_results.to_string()),
            ("tweet.fields", "created_at".to_string()),
        ];
        let resp: TimelineResponse = self.get_json(&url, &query).await?;

        Ok(resp.data.into_iter().map(RawPost::from).collect())
    }
}
