pub mod active;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod limits;
pub mod scanner;
pub mod stats;
pub mod summary;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::PathBuf;

pub use active::active_sessions;
pub use ledger::aggregate_usage;
pub use limits::{ContextLimitRule, ContextLimits};
pub use scanner::SessionLayout;
pub use types::{ActiveSession, UsageRecord};

/// How many sessions the active-session ranking returns by default
pub const DEFAULT_SESSION_LIMIT: usize = 8;

/// Default recency window for active sessions
pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;

/// Everything a scan needs to know; both pipelines are pure functions of
/// these options and the current time.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Root holding one subdirectory per agent
    pub agents_dir: PathBuf,
    pub layout: SessionLayout,
    /// Files modified before `now - lookback` are not active
    pub lookback: chrono::Duration,
    pub session_limit: usize,
    pub context_limits: ContextLimits,
}

impl ScanOptions {
    pub fn new(agents_dir: impl Into<PathBuf>) -> Self {
        Self {
            agents_dir: agents_dir.into(),
            layout: SessionLayout::default(),
            lookback: chrono::Duration::hours(DEFAULT_LOOKBACK_HOURS),
            session_limit: DEFAULT_SESSION_LIMIT,
            context_limits: ContextLimits::default(),
        }
    }
}
