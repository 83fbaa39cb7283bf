pub mod error;
pub mod types;

pub use error::{Result, TwitterError};
pub use types::{Credentials, PageQuery, RateLimit, Tweet, TweetId};

use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use types::TokenResponse;

const BASE_URL: &str = "https://api.twitter.com";

/// Pure Twitter REST client using app-only (bearer token) authentication.
///
/// Does not retry: every call makes exactly one request and reports the
/// first failure.
pub struct TwitterClient {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl TwitterClient {
    /// Exchange the application key/secret for a bearer token.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        Self::connect_with_base_url(credentials, BASE_URL).await
    }

    pub async fn connect_with_base_url(credentials: &Credentials, base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let url = format!("{}/oauth2/token", base_url);
        let resp = client
            .post(&url)
            .basic_auth(&credentials.key, Some(&credentials.secret))
            .header(
                CONTENT_TYPE,
                "application/x-www-form-urlencoded;charset=UTF-8",
            )
            .body("grant_type=client_credentials")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Auth(format!("status {}: {}", status.as_u16(), body)));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| TwitterError::Auth(format!("malformed token response: {e}")))?;
        if !token.token_type.eq_ignore_ascii_case("bearer") || token.access_token.is_empty() {
            return Err(TwitterError::Auth(format!(
                "unexpected token type {:?}",
                token.token_type
            )));
        }
        tracing::debug!("Obtained app-only bearer token");

        Ok(Self {
            client,
            base_url,
            bearer_token: token.access_token,
        })
    }

    /// Fetch one page of a user's timeline, newest first.
    pub async fn user_timeline(&self, screen_name: &str, query: &PageQuery) -> Result<Vec<Tweet>> {
        let mut params: Vec<(&str, String)> = vec![
            ("screen_name", screen_name.to_string()),
            ("trim_user", "true".into()),
            ("include_rts", "true".into()),
            ("include_entities", "true".into()),
            ("count", query.count.to_string()),
        ];
        if let Some(max_id) = query.max_id {
            params.push(("max_id", max_id.to_string()));
        }
        if let Some(since_id) = query.since_id {
            params.push(("since_id", since_id.to_string()));
        }

        let url = format!("{}/1.1/statuses/user_timeline.json", self.base_url);
        tracing::info!(
            screen_name,
            max_id = query.max_id.map(TweetId::get),
            since_id = query.since_id.map(TweetId::get),
            "Fetching user timeline"
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&params)
            .send()
            .await?;

        let resp = check_response(resp).await?;
        let body = resp.bytes().await?;
        let tweets: Vec<Tweet> = serde_json::from_slice(&body)?;
        tracing::debug!(count = tweets.len(), "Decoded timeline page");
        Ok(tweets)
    }
}

/// Reject non-2xx statuses and anything that is not UTF-8 JSON.
async fn check_response(resp: Response) -> Result<Response> {
    let rate_limit = RateLimit::from_headers(resp.headers());
    if rate_limit.remaining.is_some() {
        tracing::debug!(
            limit = rate_limit.limit,
            remaining = rate_limit.remaining,
            reset = ?rate_limit.reset,
            "Rate limit window"
        );
    }

    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TwitterError::RateLimited {
            reset: rate_limit.reset,
        });
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(TwitterError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let content_type = content_type(resp.headers());
    if !is_json_utf8(&content_type) {
        return Err(TwitterError::ContentType(content_type));
    }
    Ok(resp)
}

fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `application/json` with an explicit `charset=utf-8` parameter.
fn is_json_utf8(content_type: &str) -> bool {
    let mut parts = content_type.split(';').map(str::trim);
    let media_type = parts.next().unwrap_or_default();
    if !media_type.eq_ignore_ascii_case("application/json") {
        return false;
    }
    parts.any(|param| {
        param.split_once('=').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("charset")
                && value.trim().trim_matches('"').eq_ignore_ascii_case("utf-8")
        })
    })
}
