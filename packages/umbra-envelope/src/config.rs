//! Configuration for the caller-side conversation key cache.

use serde::{Deserialize, Serialize};

/// Default number of peers whose conversation keys are kept
pub const DEFAULT_MAX_CACHED_PEERS: usize = 1024;

/// Configuration for [`crate::cache::ConversationKeyCache`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of peers kept; the oldest entry is evicted first.
    /// Zero disables caching.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_CACHED_PEERS,
        }
    }
}
