//! # Conversation Key Cache
//!
//! Caller-owned cache of conversation keys for one local identity.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     CONVERSATION KEY CACHE                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  local SecretKey (fixed for the cache's lifetime)                      │
//! │                                                                         │
//! │  peer PublicKey ──► ConversationKey                                    │
//! │  peer PublicKey ──► ConversationKey                                    │
//! │  ...                                                                    │
//! │                                                                         │
//! │  get_or_derive(peer):                                                  │
//! │    hit  → clone of cached key                                          │
//! │    miss → ECDH + HKDF outside the lock, then insert                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two threads missing on the same peer may both derive the key; the
//! result is identical, so the second insert is harmless. Evicted and
//! cleared keys are zeroized on drop.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::config::CacheConfig;
use crate::crypto::{ConversationKey, PublicKey, SecretKey};
use crate::envelope::{codec, transport};
use crate::error::Result;

#[derive(Default)]
struct CacheInner {
    keys: HashMap<PublicKey, ConversationKey>,
    /// Insertion order, oldest first
    order: VecDeque<PublicKey>,
}

/// Conversation keys for one local identity, keyed by peer
pub struct ConversationKeyCache {
    local: SecretKey,
    config: CacheConfig,
    inner: RwLock<CacheInner>,
}

impl ConversationKeyCache {
    /// Create a cache with the default configuration
    pub fn new(local: SecretKey) -> Self {
        Self::with_config(local, CacheConfig::default())
    }

    /// Create a cache with an explicit configuration
    pub fn with_config(local: SecretKey, config: CacheConfig) -> Self {
        Self {
            local,
            config,
            inner: RwLock::new(CacheInner::default()),
        }
    }

    /// Public key of the local identity
    pub fn local_public_key(&self) -> PublicKey {
        self.local.public_key()
    }

    /// Cached key for `peer`, if present
    pub fn get(&self, peer: &PublicKey) -> Option<ConversationKey> {
        self.inner.read().keys.get(peer).cloned()
    }

    /// Cached key for `peer`, deriving and caching it on a miss
    pub fn get_or_derive(&self, peer: &PublicKey) -> ConversationKey {
        if let Some(key) = self.get(peer) {
            tracing::trace!(peer = %peer, "Conversation key cache hit");
            return key;
        }

        tracing::debug!(peer = %peer, "Deriving conversation key");
        let key = ConversationKey::derive(&self.local, peer);
        self.insert(*peer, key.clone());
        key
    }

    /// Insert or replace the key for `peer`
    pub fn insert(&self, peer: PublicKey, key: ConversationKey) {
        if self.config.max_entries == 0 {
            return;
        }

        let mut inner = self.inner.write();
        if !inner.keys.contains_key(&peer) {
            while inner.keys.len() >= self.config.max_entries {
                let Some(oldest) = inner.order.pop_front() else {
                    break;
                };
                inner.keys.remove(&oldest);
            }
            inner.order.push_back(peer);
        }
        inner.keys.insert(peer, key);
    }

    /// Remove the key for `peer`; returns whether it was present
    pub fn remove(&self, peer: &PublicKey) -> bool {
        let mut inner = self.inner.write();
        let removed = inner.keys.remove(peer).is_some();
        if removed {
            inner.order.retain(|p| p != peer);
        }
        removed
    }

    /// Drop every cached key
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.keys.clear();
        inner.order.clear();
    }

    /// Number of cached peers
    pub fn len(&self) -> usize {
        self.inner.read().keys.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.read().keys.is_empty()
    }

    /// Encrypt `plaintext` for `peer` using the cached key
    pub fn encrypt_for(&self, peer: &PublicKey, plaintext: &str) -> Result<String> {
        codec::encrypt_with_conversation_key(&self.get_or_derive(peer), plaintext)
    }

    /// Decrypt a payload from `peer` using the cached key
    pub fn decrypt_from(&self, peer: &PublicKey, payload: &str) -> Result<String> {
        let envelope = transport::decode(payload)?;
        envelope.open(&self.get_or_derive(peer))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn secret(byte: u8) -> SecretKey {
        SecretKey::from_bytes(&[byte; 32]).unwrap()
    }

    #[test]
    fn test_get_or_derive_matches_direct_derivation() {
        let cache = ConversationKeyCache::new(secret(1));
        let peer = secret(2).public_key();

        let cached = cache.get_or_derive(&peer);
        let direct = ConversationKey::derive(&secret(1), &peer);

        assert_eq!(cached.as_bytes(), direct.as_bytes());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&peer).is_some());
    }

    #[test]
    fn test_eviction_oldest_first() {
        let config = CacheConfig { max_entries: 2 };
        let cache = ConversationKeyCache::with_config(secret(1), config);
        let p2 = secret(2).public_key();
        let p3 = secret(3).public_key();
        let p4 = secret(4).public_key();

        cache.get_or_derive(&p2);
        cache.get_or_derive(&p3);
        cache.get_or_derive(&p4);

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&p2).is_none());
        assert!(cache.get(&p3).is_some());
        assert!(cache.get(&p4).is_some());
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let cache = ConversationKeyCache::with_config(secret(1), CacheConfig { max_entries: 0 });
        let peer = secret(2).public_key();

        cache.get_or_derive(&peer);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = ConversationKeyCache::new(secret(1));
        let (p2, p3) = (secret(2).public_key(), secret(3).public_key());
        cache.get_or_derive(&p2);
        cache.get_or_derive(&p3);

        assert!(cache.remove(&p2));
        assert!(!cache.remove(&p2));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cached_peers_exchange_messages() {
        let alice = ConversationKeyCache::new(secret(1));
        let bob = ConversationKeyCache::new(secret(2));

        let payload = alice.encrypt_for(&bob.local_public_key(), "via cache").unwrap();
        let plaintext = bob.decrypt_from(&alice.local_public_key(), &payload).unwrap();
        assert_eq!(plaintext, "via cache");
    }

    #[test]
    fn test_concurrent_derivation() {
        let cache = Arc::new(ConversationKeyCache::new(secret(1)));
        let peer = secret(2).public_key();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || *cache.get_or_derive(&peer).as_bytes())
            })
            .collect();

        let keys: Vec<[u8; 32]> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(keys.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.len(), 1);
    }
}
