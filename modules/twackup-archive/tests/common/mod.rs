#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use twackup_archive::TimelineSource;
use twitter_client::{PageQuery, Tweet, TwitterError};

/// Timeline that replays a fixed list of responses and records every query.
/// Once the script runs out it keeps answering with empty pages.
#[derive(Default)]
pub struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<Tweet>, TwitterError>>>,
    queries: Mutex<Vec<PageQuery>>,
}

impl ScriptedSource {
    pub fn new(pages: Vec<Vec<Tweet>>) -> Self {
        Self {
            responses: Mutex::new(pages.into_iter().map(Ok).collect()),
            queries: Mutex::default(),
        }
    }

    pub fn with_responses(responses: Vec<Result<Vec<Tweet>, TwitterError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            queries: Mutex::default(),
        }
    }

    pub fn queries(&self) -> Vec<PageQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Queries as `(max_id, since_id)` with 0 for "none".
    pub fn raw_queries(&self) -> Vec<(u64, u64)> {
        self.queries()
            .iter()
            .map(|q| {
                (
                    q.max_id.map_or(0, |id| id.get()),
                    q.since_id.map_or(0, |id| id.get()),
                )
            })
            .collect()
    }
}

#[async_trait]
impl TimelineSource for ScriptedSource {
    async fn fetch_page(&self, _user: &str, query: &PageQuery) -> twitter_client::Result<Vec<Tweet>> {
        self.queries.lock().unwrap().push(*query);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn tweet(id: u64) -> Tweet {
    serde_json::from_value(json!({
        "id": id,
        "id_str": id.to_string(),
        "text": format!("tweet number {id}"),
        "retweet_count": 0,
    }))
    .unwrap()
}

/// Newest-first page covering `newest` down to `newest - len + 1`.
pub fn page(newest: u64, len: u64) -> Vec<Tweet> {
    (0..len).map(|i| tweet(newest - i)).collect()
}

pub fn archived_ids(dir: &Path) -> Vec<u64> {
    let mut ids: Vec<u64> = std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            e.file_name()
                .to_str()?
                .strip_suffix(".json")?
                .parse()
                .ok()
        })
        .collect();
    ids.sort_unstable();
    ids
}
