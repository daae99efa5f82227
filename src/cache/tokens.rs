//! Per-user OAuth2 credential store

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::data::Credential;
use crate::error::{Result, SnooNotesError};

/// Thread-safe map from username to the user's current credential
///
/// Holds at most one credential per user. Refreshing an expired credential
/// needs the network and lives on [`SnooNotes`](crate::SnooNotes); the store
/// only keeps the result.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, Credential>>,
    /// Bumped on every write that actually changed something
    generation: AtomicU64,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `credential` for `username`
    ///
    /// Returns `false` without writing when the stored credential is already
    /// identical. The comparison runs under an upgradable read lock so
    /// concurrent readers are not blocked unless a write is needed.
    pub fn set(&self, username: &str, credential: Credential) -> bool {
        let tokens = self.tokens.upgradable_read();
        if tokens.get(username) == Some(&credential) {
            return false;
        }

        let mut tokens = RwLockUpgradableReadGuard::upgrade(tokens);
        tokens.insert(username.to_string(), credential);
        self.generation.fetch_add(1, Ordering::Relaxed);
        true
    }

    /// Returns the credential stored for `username`
    pub fn get(&self, username: &str) -> Result<Credential> {
        self.tokens
            .read()
            .get(username)
            .cloned()
            .ok_or_else(|| SnooNotesError::NoSuchUser {
                username: username.to_string(),
            })
    }

    pub fn contains(&self, username: &str) -> bool {
        self.tokens.read().contains_key(username)
    }

    /// Forgets the credential for `username`, returning it if there was one
    pub fn remove(&self, username: &str) -> Option<Credential> {
        let removed = self.tokens.write().remove(username);
        if removed.is_some() {
            self.generation.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.read().is_empty()
    }

    /// Count of writes that changed the store
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}
