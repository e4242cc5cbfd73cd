//! # Envelope Codec
//!
//! String-in, string-out entry points.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  encrypt(sender_secret, recipient_public, plaintext)                   │
//! │    1. check plaintext length              (before touching the RNG)    │
//! │    2. salt ← OS RNG                                                    │
//! │    3. conversation key ← ECDH + HKDF-Extract                           │
//! │    4. Envelope::seal → base64                                          │
//! │                                                                         │
//! │  decrypt(recipient_secret, sender_public, payload)                     │
//! │    1. base64 → Envelope                   ('#', version, size checks)  │
//! │    2. conversation key ← ECDH + HKDF-Extract                           │
//! │    3. Envelope::open                      (MAC, decrypt, unpad, UTF-8) │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `*_with_conversation_key` variants skip the ECDH step for callers
//! that cache conversation keys.

use rand::{rngs::OsRng, CryptoRng, RngCore};

use super::{transport, Envelope};
use crate::crypto::{ConversationKey, PublicKey, Salt, SecretKey};
use crate::error::Result;
use crate::padding;

/// Encrypt `plaintext` from `sender` to `recipient`, returning transport text
pub fn encrypt(sender: &SecretKey, recipient: &PublicKey, plaintext: &str) -> Result<String> {
    padding::check_plaintext_len(plaintext.len())?;
    let key = ConversationKey::derive(sender, recipient);
    encrypt_with_conversation_key(&key, plaintext)
}

/// Decrypt transport text sent by `sender` to `recipient`
pub fn decrypt(recipient: &SecretKey, sender: &PublicKey, payload: &str) -> Result<String> {
    let envelope = transport::decode(payload)?;
    let key = ConversationKey::derive(recipient, sender);
    envelope.open(&key)
}

/// Encrypt with a precomputed conversation key and a fresh OS-random salt
pub fn encrypt_with_conversation_key(key: &ConversationKey, plaintext: &str) -> Result<String> {
    encrypt_with_rng(key, plaintext, &mut OsRng)
}

/// Encrypt with a precomputed conversation key and a caller-supplied RNG
pub fn encrypt_with_rng<R: RngCore + CryptoRng + ?Sized>(
    key: &ConversationKey,
    plaintext: &str,
    rng: &mut R,
) -> Result<String> {
    padding::check_plaintext_len(plaintext.len())?;
    let salt = Salt::generate(rng)?;
    encrypt_with_salt(key, plaintext, salt)
}

/// Encrypt with an explicit salt
///
/// Deterministic; meant for reproducing test vectors. Reusing a salt with
/// the same conversation key reuses the keystream.
pub fn encrypt_with_salt(key: &ConversationKey, plaintext: &str, salt: Salt) -> Result<String> {
    let envelope = Envelope::seal(key, plaintext, salt)?;
    Ok(transport::encode(&envelope))
}

/// Decrypt transport text with a precomputed conversation key
pub fn decrypt_with_conversation_key(key: &ConversationKey, payload: &str) -> Result<String> {
    transport::decode(payload)?.open(key)
}

// ============================================================================
// TESTS
// ============================================================================
