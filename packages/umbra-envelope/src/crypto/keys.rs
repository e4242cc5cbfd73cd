//! # Key Types
//!
//! secp256k1 identity keys as seen by the envelope layer.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KEY TYPES                                      │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  SecretKey                                                             │
//! │  • 32-byte scalar, must lie in [1, n-1]                                │
//! │  • Erased on drop, never printed                                       │
//! │                                                                         │
//! │  PublicKey                                                             │
//! │  • 32-byte x-only point (BIP-340 encoding, even Y implied)             │
//! │  • Must be the x-coordinate of a point on the curve                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation happens once, at construction. Everything downstream of a
//! `SecretKey`/`PublicKey` can assume well-formed key material.

use std::fmt;

use once_cell::sync::Lazy;
use secp256k1::{All, Parity, Secp256k1, XOnlyPublicKey};

use crate::error::{Error, Result};

/// Size of a serialized secret key or x-only public key
pub const KEY_SIZE: usize = 32;

/// Shared secp256k1 context. Read-only after initialization.
pub(crate) static SECP: Lazy<Secp256k1<All>> = Lazy::new(Secp256k1::new);

// ============================================================================
// SECRET KEY
// ============================================================================

/// A validated secp256k1 private scalar
pub struct SecretKey(secp256k1::SecretKey);

impl SecretKey {
    /// Parse a 32-byte big-endian scalar
    ///
    /// Fails with [`Error::InvalidKeyMaterial`] if the scalar is zero or
    /// not below the curve order.
    pub fn from_bytes(bytes: &[u8; KEY_SIZE]) -> Result<Self> {
        secp256k1::SecretKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidKeyMaterial("secret key must be in [1, n-1]".into()))
    }

    /// Parse a 64-character hex scalar
    pub fn from_hex(s: &str) -> Result<Self> {
        let mut bytes = decode_hex_key(s)?;
        let key = Self::from_bytes(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        key
    }

    /// Derive the x-only public key for this scalar
    pub fn public_key(&self) -> PublicKey {
        let (xonly, _parity) = self.0.x_only_public_key(&SECP);
        PublicKey(xonly)
    }

    pub(crate) fn inner(&self) -> &secp256k1::SecretKey {
        &self.0
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.non_secure_erase();
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

// ============================================================================
// PUBLIC KEY
// ============================================================================

/// A validated x-only secp256k1 public key (peer identity)
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublicKey(XOnlyPublicKey);

impl PublicKey {
    /// Parse a 32-byte x-only public key
    ///
    /// Fails with [`Error::InvalidKeyMaterial`] if the bytes are not the
    /// x-coordinate of a point on the curve (this covers all-zero and
    /// all-`0xff` encodings).
    pub fn from_bytes(bytes: &[u8; KEY_SIZE]) -> Result<Self> {
        XOnlyPublicKey::from_slice(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidKeyMaterial("public key is not a valid curve point".into()))
    }

    /// Parse a 64-character hex x-only public key
    pub fn from_hex(s: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex_key(s)?)
    }

    /// Serialize to 32 bytes
    pub fn to_bytes(&self) -> [u8; KEY_SIZE] {
        self.0.serialize()
    }

    /// Serialize to lowercase hex
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Full point with even Y, as implied by the x-only encoding
    pub(crate) fn to_even_point(self) -> secp256k1::PublicKey {
        secp256k1::PublicKey::from_x_only_public_key(self.0, Parity::Even)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn decode_hex_key(s: &str) -> Result<[u8; KEY_SIZE]> {
    let mut bytes = [0u8; KEY_SIZE];
    hex::decode_to_slice(s.trim(), &mut bytes)
        .map_err(|e| Error::InvalidKeyMaterial(format!("invalid key hex: {}", e)))?;
    Ok(bytes)
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

    #[test]
    fn test_generator_public_key() {
        let sk = SecretKey::from_bytes(&scalar(1)).unwrap();
        assert_eq!(
            sk.public_key().to_hex(),
            "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_zero_scalar_rejected() {
        let result = SecretKey::from_bytes(&[0u8; 32]);
        assert!(matches!(result, Err(Error::InvalidKeyMaterial(_))));
    }

    #[test]
    fn test_scalar_at_or_above_order_rejected() {
        let order = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
            .unwrap();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&order);
        assert!(matches!(
            SecretKey::from_bytes(&bytes),
            Err(Error::InvalidKeyMaterial(_))
        ));
        assert!(matches!(
            SecretKey::from_bytes(&[0xff; 32]),
            Err(Error::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_degenerate_public_keys_rejected() {
        assert!(matches!(
            PublicKey::from_bytes(&[0u8; 32]),
            Err(Error::InvalidKeyMaterial(_))
        ));
        assert!(matches!(
            PublicKey::from_bytes(&[0xff; 32]),
            Err(Error::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_hex_round_trip() {
        let hex_key = "c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5";
        let pk = PublicKey::from_hex(hex_key).unwrap();
        assert_eq!(pk.to_hex(), hex_key);
        assert_eq!(pk.to_string(), hex_key);
    }

    #[test]
    fn test_bad_hex_rejected() {
        assert!(matches!(
            PublicKey::from_hex("not-hex"),
            Err(Error::InvalidKeyMaterial(_))
        ));
        assert!(matches!(
            SecretKey::from_hex("0102"),
            Err(Error::InvalidKeyMaterial(_))
        ));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let sk = SecretKey::from_bytes(&scalar(7)).unwrap();
        assert_eq!(format!("{:?}", sk), "SecretKey(<redacted>)");
    }
}
