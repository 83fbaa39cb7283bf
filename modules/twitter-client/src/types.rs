use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TwitterError;

/// Canonical tweet identifier. Identifiers grow strictly with recency and
/// are never zero, which leaves 0 free as the "unknown" sentinel on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweetId(u64);

impl TweetId {
    /// Returns `None` for 0, which is not a valid identifier.
    pub fn new(raw: u64) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TweetId {
    type Err = TwitterError;

    /// Accepts plain decimal digits only: no sign, no whitespace, no overflow.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TwitterError::InvalidId(s.to_string()));
        }
        s.parse::<u64>()
            .ok()
            .and_then(TweetId::new)
            .ok_or_else(|| TwitterError::InvalidId(s.to_string()))
    }
}

/// One timeline entry as returned by the API.
///
/// Only `id_str` is trusted as the identifier. The numeric `id` field is kept
/// apart on decode and never serialized again: for large identifiers it has
/// been seen to disagree with `id_str`. Everything else passes through
/// untouched in `fields`, so unknown fields survive archiving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    /// Kept as a raw value so a malformed entry fails when it is archived,
    /// not when its page is decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_str: Option<Value>,

    #[serde(rename = "id", default, skip_serializing)]
    pub untrusted_id: Option<Value>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Tweet {
    /// The canonical identifier, parsed from `id_str`.
    pub fn id(&self) -> Result<TweetId, TwitterError> {
        match &self.id_str {
            None | Some(Value::Null) => Err(TwitterError::MissingId),
            Some(Value::String(s)) => s.parse(),
            Some(other) => Err(TwitterError::InvalidId(other.to_string())),
        }
    }

    /// Field map to persist: every field except the numeric `id`, keys sorted.
    pub fn into_record(self) -> Map<String, Value> {
        let mut record = self.fields;
        if let Some(id_str) = self.id_str {
            record.insert("id_str".to_string(), id_str);
        }
        record
    }
}

/// Boundaries for one timeline request. `max_id` is inclusive on the API side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub max_id: Option<TweetId>,
    pub since_id: Option<TweetId>,
    pub count: u32,
}

impl PageQuery {
    pub fn latest(count: u32) -> Self {
        Self {
            max_id: None,
            since_id: None,
            count,
        }
    }
}

/// Application key/secret pair used for app-only authentication.
#[derive(Clone)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key", &self.key)
            .field("secret", &"[redacted]")
            .finish()
    }
}

/// Response of `POST /oauth2/token`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
}

/// Rate-limit window advertised in `x-rate-limit-*` response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<u32>,
    pub remaining: Option<u32>,
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimit {
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        fn header<T: FromStr>(headers: &reqwest::header::HeaderMap, name: &str) -> Option<T> {
            headers.get(name)?.to_str().ok()?.trim().parse().ok()
        }

        Self {
            limit: header(headers, "x-rate-limit-limit"),
            remaining: header(headers, "x-rate-limit-remaining"),
            reset: header::<i64>(headers, "x-rate-limit-reset")
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        }
    }
}
