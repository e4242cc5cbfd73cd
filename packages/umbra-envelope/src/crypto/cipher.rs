//! # Stream Cipher and MAC
//!
//! ChaCha20 (RFC 8439, 12-byte nonce, counter starting at 0) for
//! confidentiality and HMAC-SHA256 for integrity, composed
//! encrypt-then-MAC by the envelope codec.
//!
//! The MAC covers `salt || ciphertext`. Verification uses the constant-time
//! comparison provided by `hmac`.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::{ChaCha20, Key, Nonce};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::kdf::{MessageKeys, Salt};
use crate::error::{Error, Result};

/// HMAC-SHA256 type alias
type HmacSha256 = Hmac<Sha256>;

/// Size of the MAC tag in bytes
pub const MAC_SIZE: usize = 32;

/// XOR the ChaCha20 keystream into `buf` in place
///
/// The same call encrypts and decrypts.
pub fn apply_keystream(keys: &MessageKeys, buf: &mut [u8]) {
    let key = Key::from(*keys.encryption_key());
    let nonce = Nonce::from(*keys.nonce());
    let mut cipher = ChaCha20::new(&key, &nonce);
    cipher.apply_keystream(buf);
}

/// Compute `HMAC-SHA256(auth_key, salt || ciphertext)`
pub fn compute_mac(keys: &MessageKeys, salt: &Salt, ciphertext: &[u8]) -> Result<[u8; MAC_SIZE]> {
    let mac = keyed_mac(keys, salt, ciphertext)?;

    let mut tag = [0u8; MAC_SIZE];
    tag.copy_from_slice(&mac.finalize().into_bytes());
    Ok(tag)
}

/// Verify a MAC tag in constant time
///
/// Fails with [`Error::AuthenticationFailed`] on mismatch.
pub fn verify_mac(
    keys: &MessageKeys,
    salt: &Salt,
    ciphertext: &[u8],
    expected: &[u8; MAC_SIZE],
) -> Result<()> {
    keyed_mac(keys, salt, ciphertext)?
        .verify_slice(expected)
        .map_err(|_| Error::AuthenticationFailed)
}

fn keyed_mac(keys: &MessageKeys, salt: &Salt, ciphertext: &[u8]) -> Result<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(keys.auth_key())
        .map_err(|e| Error::KeyDerivationFailed(format!("HMAC key init failed: {}", e)))?;
    mac.update(salt.as_bytes());
    mac.update(ciphertext);
    Ok(mac)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::ConversationKey;

    fn keys_for(salt: &Salt) -> MessageKeys {
        let key = ConversationKey::from_bytes([42u8; 32]);
        MessageKeys::derive(&key, salt).unwrap()
    }

    #[test]
    fn test_keystream_is_involution() {
        let salt = Salt::from_bytes([1u8; 32]);
        let keys = keys_for(&salt);

        let original = b"attack at dawn, bring snacks".to_vec();
        let mut buf = original.clone();
        apply_keystream(&keys, &mut buf);
        assert_ne!(buf, original);

        apply_keystream(&keys, &mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_mac_round_trip() {
        let salt = Salt::from_bytes([3u8; 32]);
        let keys = keys_for(&salt);

        let tag = compute_mac(&keys, &salt, b"ciphertext").unwrap();
        verify_mac(&keys, &salt, b"ciphertext", &tag).unwrap();
    }

    #[test]
    fn test_mac_covers_salt() {
        let salt = Salt::from_bytes([3u8; 32]);
        let other = Salt::from_bytes([4u8; 32]);
        let keys = keys_for(&salt);

        let tag = compute_mac(&keys, &salt, b"ciphertext").unwrap();
        let result = verify_mac(&keys, &other, b"ciphertext", &tag);
        assert_eq!(result, Err(Error::AuthenticationFailed));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let salt = Salt::from_bytes([5u8; 32]);
        let keys = keys_for(&salt);

        let mut tag = compute_mac(&keys, &salt, b"ciphertext").unwrap();
        tag[31] ^= 0x01;
        assert_eq!(
            verify_mac(&keys, &salt, b"ciphertext", &tag),
            Err(Error::AuthenticationFailed)
        );
    }
}
