//! # Envelope
//!
//! Binary layout, version dispatch, and the seal/open pipeline.
//!
//! ## Layout (version 0x02)
//!
//! ```text
//! ┌─────────┬──────────────┬───────────────────────────┬──────────────┐
//! │ version │ salt         │ ciphertext                │ MAC          │
//! │ 1 byte  │ 32 bytes     │ 2 + pad(n) bytes          │ 32 bytes     │
//! └─────────┴──────────────┴───────────────────────────┴──────────────┘
//!   offset 0  offset 1       offset 33                   end - 32
//! ```
//!
//! ## Seal / Open
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  seal(conversation_key, plaintext, salt)                               │
//! │    1. pad(plaintext)                       (length checked here)       │
//! │    2. MessageKeys::derive(conversation_key, salt)                      │
//! │    3. ChaCha20(padded)                     → ciphertext                │
//! │    4. HMAC-SHA256(salt || ciphertext)      → MAC                       │
//! │                                                                         │
//! │  open(conversation_key)                                                │
//! │    1. MessageKeys::derive(conversation_key, salt)                      │
//! │    2. verify MAC (constant time)           ← before any decryption     │
//! │    3. ChaCha20(ciphertext)                 → padded                    │
//! │    4. unpad(padded)                        → plaintext                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod transport;

use zeroize::Zeroizing;

use crate::crypto::{cipher, ConversationKey, MessageKeys, Salt, MAC_SIZE, SALT_SIZE};
use crate::error::{Error, Result};
use crate::padding::{self, LENGTH_PREFIX_SIZE, MIN_PADDED_LEN};

/// Size of the version field
pub const VERSION_SIZE: usize = 1;

/// Smallest valid ciphertext: length prefix plus the minimum padded length
pub const MIN_CIPHERTEXT_SIZE: usize = LENGTH_PREFIX_SIZE + MIN_PADDED_LEN;

/// Largest valid ciphertext: length prefix plus `pad(MAX_PLAINTEXT_SIZE)`
pub const MAX_CIPHERTEXT_SIZE: usize = LENGTH_PREFIX_SIZE + 0x10000;

/// Smallest valid envelope in bytes (99)
pub const MIN_ENVELOPE_SIZE: usize = VERSION_SIZE + SALT_SIZE + MIN_CIPHERTEXT_SIZE + MAC_SIZE;

/// Largest valid envelope in bytes (65603)
pub const MAX_ENVELOPE_SIZE: usize = VERSION_SIZE + SALT_SIZE + MAX_CIPHERTEXT_SIZE + MAC_SIZE;

// ============================================================================
// VERSION
// ============================================================================

/// Supported envelope versions
///
/// Adding a version means adding a variant here and an arm in
/// [`Envelope::open`]; unknown bytes are rejected by `TryFrom<u8>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Version {
    /// secp256k1 ECDH, HKDF-SHA256, ChaCha20, HMAC-SHA256, padded
    V2 = 0x02,
}

impl Version {
    /// Version used for new envelopes
    pub const CURRENT: Version = Version::V2;

    /// The on-wire byte
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Version {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        match byte {
            0x02 => Ok(Version::V2),
            other => Err(Error::UnsupportedVersion(format!(
                "unknown version byte 0x{:02x}",
                other
            ))),
        }
    }
}

// ============================================================================
// ENVELOPE
// ============================================================================

/// A parsed, not yet authenticated envelope
///
/// Holding an `Envelope` says nothing about its integrity; only
/// [`Envelope::open`] verifies the MAC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    version: Version,
    salt: Salt,
    ciphertext: Vec<u8>,
    mac: [u8; MAC_SIZE],
}

impl Envelope {
    /// Encrypt and authenticate `plaintext` under `key` with the given salt
    ///
    /// The salt must never be reused with the same conversation key; use
    /// [`Salt::random`] outside of tests.
    pub fn seal(key: &ConversationKey, plaintext: &str, salt: Salt) -> Result<Self> {
        let mut padded = padding::pad(plaintext)?;
        let keys = MessageKeys::derive(key, &salt)?;

        let mut ciphertext = std::mem::take(&mut *padded);
        cipher::apply_keystream(&keys, &mut ciphertext);
        let mac = cipher::compute_mac(&keys, &salt, &ciphertext)?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = ciphertext.len(),
            "Sealed envelope"
        );

        Ok(Self {
            version: Version::CURRENT,
            salt,
            ciphertext,
            mac,
        })
    }

    /// Verify and decrypt this envelope
    ///
    /// The MAC is checked before any plaintext is produced. On any failure
    /// no plaintext (or plaintext length) escapes.
    pub fn open(&self, key: &ConversationKey) -> Result<String> {
        match self.version {
            Version::V2 => self.open_v2(key),
        }
    }

    fn open_v2(&self, key: &ConversationKey) -> Result<String> {
        let keys = MessageKeys::derive(key, &self.salt)?;

        if let Err(e) = cipher::verify_mac(&keys, &self.salt, &self.ciphertext, &self.mac) {
            tracing::debug!(envelope_len = self.encoded_len(), "MAC verification failed");
            return Err(e);
        }

        let mut padded = Zeroizing::new(self.ciphertext.clone());
        cipher::apply_keystream(&keys, &mut padded);

        padding::unpad(&padded)
    }

    /// Parse the binary layout
    ///
    /// Checks the version byte first, then the total size. Does not touch
    /// the MAC.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (&first, _) = bytes
            .split_first()
            .ok_or_else(|| Error::MalformedEnvelope("empty envelope".into()))?;
        let version = Version::try_from(first)?;

        let len = bytes.len();
        if !(MIN_ENVELOPE_SIZE..=MAX_ENVELOPE_SIZE).contains(&len) {
            return Err(Error::MalformedEnvelope(format!(
                "invalid envelope size {} (must be {}..={})",
                len, MIN_ENVELOPE_SIZE, MAX_ENVELOPE_SIZE
            )));
        }

        let salt_end = VERSION_SIZE + SALT_SIZE;
        let mac_start = len - MAC_SIZE;

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&bytes[VERSION_SIZE..salt_end]);
        let mut mac = [0u8; MAC_SIZE];
        mac.copy_from_slice(&bytes[mac_start..]);

        Ok(Self {
            version,
            salt: Salt::from_bytes(salt),
            ciphertext: bytes[salt_end..mac_start].to_vec(),
            mac,
        })
    }

    /// Serialize to the binary layout
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.push(self.version.as_byte());
        out.extend_from_slice(self.salt.as_bytes());
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.mac);
        out
    }

    /// Length of the binary layout in bytes
    pub fn encoded_len(&self) -> usize {
        VERSION_SIZE + SALT_SIZE + self.ciphertext.len() + MAC_SIZE
    }

    /// Envelope version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Per-message salt
    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    /// Encrypted padded plaintext
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// MAC tag
    pub fn mac(&self) -> &[u8; MAC_SIZE] {
        &self.mac
    }
}

// ============================================================================
// TESTS
// ============================================================================
