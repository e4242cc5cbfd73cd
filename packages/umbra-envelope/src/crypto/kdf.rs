//! # Key Derivation
//!
//! HKDF-SHA256 in two stages: once per peer pair, then once per message.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 SHARED SECRET → MESSAGE KEYS                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  shared_x (32 bytes, raw ECDH x-coordinate)                            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  HKDF-Extract(salt = "nip44-v2", ikm = shared_x)                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  Conversation Key (32 bytes)     ◄── cache this per peer               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  HKDF-Expand(prk = conversation_key, info = message_salt, L = 76)      │
//! │        │                                                                │
//! │        ├──► [0, 32)   ChaCha20 key                                     │
//! │        ├──► [32, 44)  ChaCha20 nonce                                   │
//! │        └──► [44, 76)  HMAC-SHA256 key                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use hkdf::Hkdf;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ecdh::{shared_x, SharedSecret};
use super::keys::{PublicKey, SecretKey};
use crate::error::{Error, Result};

/// Fixed context string used as the HKDF-Extract salt for conversation keys
pub const CONVERSATION_KEY_SALT: &[u8] = b"nip44-v2";

/// Size of the conversation key in bytes
pub const CONVERSATION_KEY_SIZE: usize = 32;

/// Size of the per-message salt in bytes
pub const SALT_SIZE: usize = 32;

/// ChaCha20 key size
pub const ENCRYPTION_KEY_SIZE: usize = 32;

/// ChaCha20 (IETF) nonce size
pub const NONCE_SIZE: usize = 12;

/// HMAC-SHA256 key size
pub const AUTH_KEY_SIZE: usize = 32;

/// Total HKDF-Expand output for one message
pub const MESSAGE_KEYS_SIZE: usize = ENCRYPTION_KEY_SIZE + NONCE_SIZE + AUTH_KEY_SIZE;

// ============================================================================
// CONVERSATION KEY
// ============================================================================

/// Long-lived symmetric key shared by two identities
///
/// Order-independent: both sides derive the same value. Deriving it costs an
/// elliptic-curve multiplication, so callers talking to the same peer
/// repeatedly should keep it around (see [`crate::cache`]).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ConversationKey([u8; CONVERSATION_KEY_SIZE]);

impl ConversationKey {
    /// Derive the conversation key between `secret` and `peer`
    pub fn derive(secret: &SecretKey, peer: &PublicKey) -> Self {
        let shared = shared_x(secret, peer);
        Self::from_shared_secret(&shared)
    }

    /// Derive the conversation key from an ECDH x-coordinate
    pub fn from_shared_secret(shared: &SharedSecret) -> Self {
        let (prk, _) = Hkdf::<Sha256>::extract(Some(CONVERSATION_KEY_SALT), shared.as_bytes());

        let mut key = [0u8; CONVERSATION_KEY_SIZE];
        key.copy_from_slice(&prk);
        Self(key)
    }

    /// Wrap a previously derived conversation key
    pub fn from_bytes(bytes: [u8; CONVERSATION_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw key bytes
    pub fn as_bytes(&self) -> &[u8; CONVERSATION_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConversationKey(<redacted>)")
    }
}

// ============================================================================
// MESSAGE SALT
// ============================================================================

/// Per-message random salt
///
/// Public: it travels in the clear inside every envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generate a salt from the operating system's secure RNG
    pub fn random() -> Result<Self> {
        Self::generate(&mut OsRng)
    }

    /// Generate a salt from a caller-supplied secure RNG
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<Self> {
        let mut bytes = [0u8; SALT_SIZE];
        rng.try_fill_bytes(&mut bytes).map_err(|_| Error::RngFailed)?;
        Ok(Self(bytes))
    }

    /// Create from existing bytes
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

// ============================================================================
// MESSAGE KEYS
// ============================================================================

/// Single-use key bundle for one envelope
///
/// Tied to one (conversation key, salt) pair. Zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MessageKeys {
    encryption_key: [u8; ENCRYPTION_KEY_SIZE],
    nonce: [u8; NONCE_SIZE],
    auth_key: [u8; AUTH_KEY_SIZE],
}

impl MessageKeys {
    /// Expand a conversation key and salt into the message key bundle
    pub fn derive(conversation_key: &ConversationKey, salt: &Salt) -> Result<Self> {
        let hkdf = Hkdf::<Sha256>::from_prk(conversation_key.as_bytes())
            .map_err(|_| Error::KeyDerivationFailed("invalid conversation key length".into()))?;

        let mut okm = [0u8; MESSAGE_KEYS_SIZE];
        hkdf.expand(salt.as_bytes(), &mut okm)
            .map_err(|_| Error::KeyDerivationFailed("HKDF expansion failed".into()))?;

        let mut keys = Self {
            encryption_key: [0u8; ENCRYPTION_KEY_SIZE],
            nonce: [0u8; NONCE_SIZE],
            auth_key: [0u8; AUTH_KEY_SIZE],
        };
        keys.encryption_key.copy_from_slice(&okm[..ENCRYPTION_KEY_SIZE]);
        keys.nonce
            .copy_from_slice(&okm[ENCRYPTION_KEY_SIZE..ENCRYPTION_KEY_SIZE + NONCE_SIZE]);
        keys.auth_key
            .copy_from_slice(&okm[ENCRYPTION_KEY_SIZE + NONCE_SIZE..]);
        okm.zeroize();

        Ok(keys)
    }

    /// ChaCha20 key
    pub fn encryption_key(&self) -> &[u8; ENCRYPTION_KEY_SIZE] {
        &self.encryption_key
    }

    /// ChaCha20 nonce
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// HMAC-SHA256 key
    pub fn auth_key(&self) -> &[u8; AUTH_KEY_SIZE] {
        &self.auth_key
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(last: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = last;
        bytes
    }

    fn known_conversation_key() -> ConversationKey {
        let one = SecretKey::from_bytes(&scalar(1)).unwrap();
        let two = SecretKey::from_bytes(&scalar(2)).unwrap();
        ConversationKey::derive(&one, &two.public_key())
    }

    #[test]
    fn test_conversation_key_vector() {
        assert_eq!(
            hex::encode(known_conversation_key().as_bytes()),
            "c41c775356fd92eadc63ff5a0dc1da211b268cbea22316767095b2871ea1412d"
        );
    }

    #[test]
    fn test_conversation_key_symmetric() {
        let a = SecretKey::from_bytes(&[0x5a; 32]).unwrap();
        let b = SecretKey::from_bytes(&[0xa5; 32]).unwrap();

        let ab = ConversationKey::derive(&a, &b.public_key());
        let ba = ConversationKey::derive(&b, &a.public_key());
        assert_eq!(ab.as_bytes(), ba.as_bytes());
    }

    #[test]
    fn test_message_keys_vector() {
        let salt = Salt::from_bytes(scalar(1));
        let keys = MessageKeys::derive(&known_conversation_key(), &salt).unwrap();

        assert_eq!(
            hex::encode(keys.encryption_key()),
            "63e64ca552c6a0664d4f6402c033fd698f43d531520e177d7c5c84357feafd1a"
        );
        assert_eq!(hex::encode(keys.nonce()), "1f58294fc1d270dc407146ca");
        assert_eq!(
            hex::encode(keys.auth_key()),
            "b3bd1176db3c377f82fd03162d0f3a9a323cace39fb89970b9f32395476e1a08"
        );
    }

    #[test]
    fn test_different_salts_different_keys() {
        let key = known_conversation_key();
        let k1 = MessageKeys::derive(&key, &Salt::from_bytes([1u8; 32])).unwrap();
        let k2 = MessageKeys::derive(&key, &Salt::from_bytes([2u8; 32])).unwrap();

        assert_ne!(k1.encryption_key(), k2.encryption_key());
        assert_ne!(k1.nonce(), k2.nonce());
        assert_ne!(k1.auth_key(), k2.auth_key());
    }

    #[test]
    fn test_random_salts_differ() {
        let s1 = Salt::random().unwrap();
        let s2 = Salt::random().unwrap();
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_conversation_key_debug_is_redacted() {
        let key = ConversationKey::from_bytes([7u8; 32]);
        assert_eq!(format!("{:?}", key), "ConversationKey(<redacted>)");
    }
}
