pub mod config;
pub mod error;
pub mod paginator;
pub mod store;
pub mod sync;

pub use config::{load_config, load_default_config, Config, ConfigError};
pub use error::{ErrorKind, Result, SyncError};
pub use paginator::{Paginator, TimelineSource, PAGE_SIZE};
pub use store::{ArchiveDir, CoverageRange, StoreError};
pub use sync::{sync, SyncReport};
