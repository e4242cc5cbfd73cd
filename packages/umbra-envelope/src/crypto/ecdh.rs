//! # Key Agreement
//!
//! secp256k1 ECDH returning the raw x-coordinate of the shared point.
//!
//! ```text
//! alice_secret × bob_public = bob_secret × alice_public = P
//!                                                         │
//!                                                         ▼
//!                                            x(P) as 32 big-endian bytes
//! ```
//!
//! The x-coordinate is returned unhashed. Hashing is the job of the
//! conversation key derivation in [`super::kdf`].

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::keys::{PublicKey, SecretKey, KEY_SIZE};
use crate::error::Result;

/// Raw ECDH x-coordinate (32 bytes)
///
/// Zeroized when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; KEY_SIZE]);

impl SharedSecret {
    /// Get the raw bytes (for key derivation)
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

/// Compute the ECDH shared x-coordinate between `secret` and `public`
///
/// Both keys were validated at construction, so this cannot fail.
/// `shared_x(a, B) == shared_x(b, A)` for any two keypairs.
pub fn shared_x(secret: &SecretKey, public: &PublicKey) -> SharedSecret {
    let point = public.to_even_point();
    let mut xy = secp256k1::ecdh::shared_secret_point(&point, secret.inner());

    let mut x = [0u8; KEY_SIZE];
    x.copy_from_slice(&xy[..KEY_SIZE]);
    xy.zeroize();

    SharedSecret(x)
}

/// Compute the ECDH shared x-coordinate from raw key bytes
///
/// Fails with `InvalidKeyMaterial` if either key is invalid; no
/// derivation is attempted in that case.
pub fn shared_x_from_bytes(
    secret: &[u8; KEY_SIZE],
    public: &[u8; KEY_SIZE],
) -> Result<SharedSecret> {
    let secret = SecretKey::from_bytes(secret)?;
    let public = PublicKey::from_bytes(public)?;
    Ok(shared_x(&secret, &public))
}

// ============================================================================
// TESTS
// ============================================================================
