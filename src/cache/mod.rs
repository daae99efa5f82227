//! In-memory caches owned by a client
//!
//! [`TokenStore`] keeps one OAuth2 credential per user and [`ConfigCache`]
//! keeps subreddit settings for a fixed TTL. Neither is persisted; both are
//! safe to share across threads.

mod config_cache;
mod tokens;

pub use config_cache::ConfigCache;
pub use tokens::TokenStore;
