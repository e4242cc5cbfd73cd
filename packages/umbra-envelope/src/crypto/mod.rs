//! # Cryptography Module
//!
//! Primitives composed by the envelope codec.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC PIPELINE                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   SecretKey ──┐                                                        │
//! │               ├──► ecdh::shared_x ──► kdf::ConversationKey             │
//! │   PublicKey ──┘                              │                         │
//! │                                              │   + Salt                │
//! │                                              ▼                         │
//! │                                     kdf::MessageKeys                   │
//! │                                      │            │                    │
//! │                                      ▼            ▼                    │
//! │                            cipher::apply_   cipher::compute_mac /      │
//! │                            keystream        cipher::verify_mac         │
//! │                            (ChaCha20)       (HMAC-SHA256)              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Algorithms
//!
//! | Purpose | Algorithm | Crate |
//! |---------|-----------|-------|
//! | Key agreement | secp256k1 ECDH (x-only) | `secp256k1` |
//! | Key derivation | HKDF-SHA256 | `hkdf`, `sha2` |
//! | Confidentiality | ChaCha20 | `chacha20` |
//! | Integrity | HMAC-SHA256 | `hmac`, `sha2` |

pub mod cipher;
pub mod ecdh;
pub mod kdf;
pub mod keys;

pub use cipher::MAC_SIZE;
pub use ecdh::{shared_x, shared_x_from_bytes, SharedSecret};
pub use kdf::{ConversationKey, MessageKeys, Salt, SALT_SIZE};
pub use keys::{PublicKey, SecretKey, KEY_SIZE};
