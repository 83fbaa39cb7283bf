use twitter_client::{TweetId, TwitterError};

use crate::config::ConfigError;
use crate::store::StoreError;

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Coarse classification of a failure. Every kind is fatal for the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Transport,
    Format,
    Filesystem,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] TwitterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Timeline returned {got} while sweeping {direction} from {boundary}")]
    Stalled {
        direction: &'static str,
        boundary: TweetId,
        got: TweetId,
    },
}

impl SyncError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Config(_) => ErrorKind::Config,
            SyncError::Fetch(e) if e.is_format_error() => ErrorKind::Format,
            SyncError::Fetch(_) => ErrorKind::Transport,
            SyncError::Store(e) => e.kind(),
            SyncError::Stalled { .. } => ErrorKind::Format,
        }
    }
}
