// On-disk archive: one `<id>.json` file per tweet in a flat directory.
// The directory is the only record of what has been archived.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;
use twitter_client::{Tweet, TweetId, TwitterError};

use crate::error::ErrorKind;

const JSON_SUFFIX: &str = ".json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read archive directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot archive tweet: {0}")]
    InvalidTweet(#[from] TwitterError),

    #[error("Failed to serialize tweet {id}: {source}")]
    Serialize {
        id: TweetId,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::ReadDir { .. } | StoreError::Write { .. } => ErrorKind::Filesystem,
            StoreError::InvalidTweet(_) | StoreError::Serialize { .. } => ErrorKind::Format,
        }
    }
}

/// Oldest and newest identifiers present in the archive. Both are `None` for
/// an empty archive. The range may contain gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageRange {
    pub oldest: Option<TweetId>,
    pub newest: Option<TweetId>,
}

impl CoverageRange {
    pub fn is_empty(&self) -> bool {
        self.newest.is_none()
    }

    /// `(oldest, newest)` with 0 standing in for "none".
    pub fn as_raw(&self) -> (u64, u64) {
        (
            self.oldest.map_or(0, TweetId::get),
            self.newest.map_or(0, TweetId::get),
        )
    }

    fn include(&mut self, id: TweetId) {
        self.oldest = Some(self.oldest.map_or(id, |o| o.min(id)));
        self.newest = Some(self.newest.map_or(id, |n| n.max(id)));
    }
}

/// Archive directory plus the token that keeps this writer's temp files
/// apart from any other writer's.
#[derive(Debug, Clone)]
pub struct ArchiveDir {
    dir: PathBuf,
    tmp_token: String,
}

impl ArchiveDir {
    pub fn new(dir: impl Into<PathBuf>, tmp_token: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            tmp_token: tmp_token.into(),
        }
    }

    /// Uses the current process id as the temp-file token.
    pub fn for_process(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, std::process::id().to_string())
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn tweet_path(&self, id: TweetId) -> PathBuf {
        self.dir.join(format!("{id}{JSON_SUFFIX}"))
    }

    fn tmp_path(&self, id: TweetId) -> PathBuf {
        self.dir
            .join(format!("{id}{JSON_SUFFIX}.{}.tmp", self.tmp_token))
    }

    /// Compute the coverage range from the `<digits>.json` entries in the
    /// directory. Anything else in the directory is ignored.
    pub fn scan_range(&self) -> Result<CoverageRange, StoreError> {
        let read_dir_err = |source| StoreError::ReadDir {
            path: self.dir.clone(),
            source,
        };

        let mut range = CoverageRange::default();
        let mut matched = 0usize;
        // read_dir streams entries, so huge archives are never listed in one go.
        for entry in fs::read_dir(&self.dir).map_err(read_dir_err)? {
            let entry = entry.map_err(read_dir_err)?;
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(parse_tweet_file_name) else {
                continue;
            };
            range.include(id);
            matched += 1;
        }

        let (oldest, newest) = range.as_raw();
        debug!(dir = %self.dir.display(), matched, oldest, newest, "Scanned archive");
        Ok(range)
    }

    /// Write a tweet to `<id>.json`, replacing any previous copy.
    ///
    /// The content goes to a temp file in the same directory first and is
    /// renamed into place, so a reader never sees a partial file. The temp
    /// file is removed if any step fails.
    pub fn save(&self, tweet: Tweet) -> Result<TweetId, StoreError> {
        let id = tweet.id()?;
        let record = tweet.into_record();
        let out = serde_json::to_vec_pretty(&record)
            .map_err(|source| StoreError::Serialize { id, source })?;

        let path = self.tweet_path(id);
        let tmp = self.tmp_path(id);
        if let Err(source) = write_then_rename(&tmp, &path, &out) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Write { path, source });
        }
        Ok(id)
    }
}

fn write_then_rename(tmp: &Path, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, path)
}

/// `"123.json"` -> `Some(123)`. Non-numeric stems, overflow and 0 are `None`.
fn parse_tweet_file_name(name: &str) -> Option<TweetId> {
    name.strip_suffix(JSON_SUFFIX)?.parse().ok()
}
