// Directional sweeps over a newest-first, identifier-bounded timeline.
//
// The feed can only hand out "the newest N below/above a boundary", so:
// - older sweeps stream page by page, saving each page before the next fetch;
// - newer sweeps must buffer every page and flush once the feed is drained.

use async_trait::async_trait;
use tracing::{debug, info};
use twitter_client::{PageQuery, Tweet, TweetId, TwitterClient};

use crate::error::{Result, SyncError};
use crate::store::ArchiveDir;

/// Maximum number of tweets requested per page.
pub const PAGE_SIZE: u32 = 200;

/// Source of timeline pages, newest first.
#[async_trait]
pub trait TimelineSource: Send + Sync {
    async fn fetch_page(
        &self,
        user: &str,
        query: &PageQuery,
    ) -> twitter_client::Result<Vec<Tweet>>;
}

#[async_trait]
impl TimelineSource for TwitterClient {
    async fn fetch_page(
        &self,
        user: &str,
        query: &PageQuery,
    ) -> twitter_client::Result<Vec<Tweet>> {
        self.user_timeline(user, query).await
    }
}

pub struct Paginator<'a, S: ?Sized> {
    source: &'a S,
    store: &'a ArchiveDir,
    user: &'a str,
}

impl<'a, S: TimelineSource + ?Sized> Paginator<'a, S> {
    pub fn new(source: &'a S, store: &'a ArchiveDir, user: &'a str) -> Self {
        Self {
            source,
            store,
            user,
        }
    }

    /// One page of up to [`PAGE_SIZE`] tweets. `max_id` is inclusive, so
    /// callers pass one below an identifier they already hold.
    pub async fn fetch_page(
        &self,
        max_id: Option<TweetId>,
        since_id: Option<TweetId>,
    ) -> Result<Vec<Tweet>> {
        let query = PageQuery {
            max_id,
            since_id,
            count: PAGE_SIZE,
        };
        Ok(self.source.fetch_page(self.user, &query).await?)
    }

    /// Walk back in time from `oldest` (or from the newest tweet when `None`)
    /// until the feed returns an empty page. Returns the number saved.
    pub async fn sweep_older(&self, oldest: Option<TweetId>) -> Result<usize> {
        let mut boundary = oldest;
        let mut saved = 0;

        loop {
            let max_id = match boundary {
                None => None,
                Some(b) => match TweetId::new(b.get() - 1) {
                    Some(max_id) => Some(max_id),
                    None => {
                        debug!(user = self.user, "Nothing can be older than id 1");
                        break;
                    }
                },
            };

            let page = self.fetch_page(max_id, None).await?;
            if page.is_empty() {
                break;
            }

            let count = page.len();
            let mut last = None;
            for tweet in page {
                last = Some(self.store.save(tweet)?);
            }
            saved += count;

            let Some(last) = last else { break };
            if let Some(b) = boundary.filter(|&b| last >= b) {
                return Err(SyncError::Stalled {
                    direction: "older",
                    boundary: b,
                    got: last,
                });
            }
            boundary = Some(last);
            info!(user = self.user, count, oldest = last.get(), "Saved old tweets");
        }

        Ok(saved)
    }

    /// Collect everything newer than `newest`, then save it oldest first.
    /// Nothing is written unless the feed is drained without error.
    pub async fn sweep_newer(&self, newest: TweetId) -> Result<usize> {
        let mut boundary = newest;
        let mut buffered: Vec<Tweet> = Vec::new();

        loop {
            let page = self.fetch_page(None, Some(boundary)).await?;
            let Some(first) = page.first() else { break };

            let page_newest = first.id()?;
            if page_newest <= boundary {
                return Err(SyncError::Stalled {
                    direction: "newer",
                    boundary,
                    got: page_newest,
                });
            }
            debug!(
                user = self.user,
                count = page.len(),
                newest = page_newest.get(),
                "Buffered new tweets"
            );
            buffered.extend(page);
            boundary = page_newest;
        }

        let count = buffered.len();
        for tweet in flush_order(buffered) {
            self.store.save(tweet)?;
        }
        info!(user = self.user, count, "Saved new tweets");
        Ok(count)
    }
}

/// Buffered tweets in write order: last appended first.
fn flush_order(buffered: Vec<Tweet>) -> impl Iterator<Item = Tweet> {
    buffered.into_iter().rev()
}
