//! In-memory cache of subreddit settings
//!
//! Entries remember when they were stored; a read after the TTL is a miss
//! and the caller is expected to fetch fresh settings and `put` them.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::config::DEFAULT_CONFIG_TTL;
use crate::data::SubSettings;

/// A cached settings value and the moment it was stored
#[derive(Debug, Clone)]
struct CacheEntry {
    data: SubSettings,
    cached_at: DateTime<Utc>,
}

/// Subreddit name to settings, with a fixed time-to-live
///
/// There is no eviction besides the TTL check on read. The key space is the
/// set of subreddits one bot moderates, so growth is not a concern.
#[derive(Debug)]
pub struct ConfigCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_CONFIG_TTL)
    }
}

impl ConfigCache {
    /// Creates a cache with the default 24 hour TTL
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache with a custom TTL
    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
        }
    }

    /// Returns the cached settings for `subreddit` if they are still fresh
    pub fn get(&self, subreddit: &str) -> Option<SubSettings> {
        self.get_at(subreddit, Utc::now())
    }

    /// Same as [`get`](Self::get), evaluated at `now`
    ///
    /// A hit requires `now < cached_at + ttl`; at the boundary it is a miss.
    pub fn get_at(&self, subreddit: &str, now: DateTime<Utc>) -> Option<SubSettings> {
        let entries = self.entries.read();
        let entry = entries.get(subreddit)?;
        let fresh = entry
            .cached_at
            .checked_add_signed(self.ttl)
            .map_or(true, |valid_until| now < valid_until);

        fresh.then(|| entry.data.clone())
    }

    /// Stores settings for `subreddit`, replacing any previous entry
    pub fn put(&self, subreddit: &str, config: SubSettings) {
        self.put_at(subreddit, config, Utc::now());
    }

    /// Same as [`put`](Self::put), with an explicit store time
    pub fn put_at(&self, subreddit: &str, config: SubSettings, now: DateTime<Utc>) {
        let entry = CacheEntry {
            data: config,
            cached_at: now,
        };
        self.entries.write().insert(subreddit.to_string(), entry);
    }

    /// When `subreddit` was last stored, expired or not
    pub fn cached_at(&self, subreddit: &str) -> Option<DateTime<Utc>> {
        self.entries.read().get(subreddit).map(|e| e.cached_at)
    }

    /// Number of entries, including expired ones
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
