use tracing::info;

use crate::error::Result;
use crate::paginator::{Paginator, TimelineSource};
use crate::store::{ArchiveDir, CoverageRange};

/// Outcome of one archive run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Coverage found on disk before anything was fetched.
    pub range: CoverageRange,
    pub newer_saved: usize,
    pub older_saved: usize,
}

/// Bring the archive up to date: fetch anything newer than the newest
/// archived tweet, then backfill from the oldest one.
///
/// The newer sweep is skipped on an empty archive, where the older sweep
/// alone fetches everything with bounded memory. The older sweep always
/// starts from the range scanned at the beginning of the run. Any error
/// aborts the run; tweets saved before it stay on disk.
pub async fn sync<S: TimelineSource + ?Sized>(
    source: &S,
    store: &ArchiveDir,
    user: &str,
) -> Result<SyncReport> {
    let range = store.scan_range()?;
    let (oldest, newest) = range.as_raw();
    info!(user, dir = %store.path().display(), oldest, newest, "Archive range");

    let paginator = Paginator::new(source, store, user);

    let mut newer_saved = 0;
    if let Some(newest) = range.newest {
        info!(user, newest = newest.get(), "Fetching tweets newer than archive");
        newer_saved = paginator.sweep_newer(newest).await?;
    }

    info!(user, oldest, "Fetching tweets older than archive");
    let older_saved = paginator.sweep_older(range.oldest).await?;

    Ok(SyncReport {
        range,
        newer_saved,
        older_saved,
    })
}
