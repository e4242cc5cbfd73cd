//! # Umbra Envelope
//!
//! Versioned, padded, authenticated encryption of short text messages
//! between two secp256k1 identities. The only shared context is each
//! party's public key.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       UMBRA ENVELOPE MODULES                            │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌──────────────┐   │
//! │  │   Crypto    │  │   Padding   │  │  Envelope   │  │    Cache     │   │
//! │  │             │  │             │  │             │  │              │   │
//! │  │ - ECDH      │  │ - pad(n)    │  │ - Layout    │  │ - Per-peer   │   │
//! │  │ - HKDF      │  │ - Prefix    │  │ - Versions  │  │   conv. keys │   │
//! │  │ - ChaCha20  │  │ - Unpad     │  │ - Seal/Open │  │ - Eviction   │   │
//! │  │ - HMAC      │  │             │  │ - Base64    │  │              │   │
//! │  └──────┬──────┘  └──────┬──────┘  └──────┬──────┘  └──────┬───────┘   │
//! │         │                │                │                │           │
//! │         └────────────────┴────────┬───────┴────────────────┘           │
//! │                                   ▼                                     │
//! │                  encrypt / decrypt (transport text)                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Hierarchy
//!
//! - [`error`] - Error types
//! - [`crypto`] - Keys, key agreement, key derivation, cipher and MAC
//! - [`padding`] - Length-hiding padding
//! - [`envelope`] - Binary layout, version dispatch, transport text
//! - [`cache`] - Caller-owned conversation key cache
//! - [`config`] - Cache configuration
//!
//! ## Example
//!
//! ```
//! use umbra_envelope::{decrypt, encrypt, SecretKey};
//!
//! let alice = SecretKey::from_bytes(&[0x11; 32])?;
//! let bob = SecretKey::from_bytes(&[0x22; 32])?;
//!
//! let payload = encrypt(&alice, &bob.public_key(), "hello bob")?;
//! let plaintext = decrypt(&bob, &alice.public_key(), &payload)?;
//! assert_eq!(plaintext, "hello bob");
//! # Ok::<(), umbra_envelope::Error>(())
//! ```
//!
//! ## Security Model
//!
//! | Property | Guarantee |
//! |----------|-----------|
//! | Confidentiality | Only the two key holders can read the message |
//! | Integrity | Any modified bit fails MAC verification |
//! | Length hiding | Plaintext length is only revealed up to its padding bucket |
//! | Forward secrecy | Not provided |
//! | Deniability | Not provided |

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod cache;
pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod padding;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use cache::ConversationKeyCache;
pub use config::CacheConfig;
pub use crypto::{ConversationKey, PublicKey, Salt, SecretKey};
pub use envelope::codec::{
    decrypt, decrypt_with_conversation_key, encrypt, encrypt_with_conversation_key,
    encrypt_with_rng, encrypt_with_salt,
};
pub use envelope::{Envelope, Version};
pub use error::{Error, Result};

/// Returns the version of this crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
