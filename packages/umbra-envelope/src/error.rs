//! # Error Handling
//!
//! Error types for sealing and opening envelopes.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Key Errors                                                        │
//! │  │   ├── InvalidKeyMaterial     - Bad scalar, bad point, bad hex       │
//! │  │   └── KeyDerivationFailed    - HKDF refused the request             │
//! │  │                                                                      │
//! │  ├── Plaintext Errors                                                  │
//! │  │   ├── PlaintextLengthInvalid - Outside [1, 65408] bytes             │
//! │  │   └── RngFailed              - OS random source failed              │
//! │  │                                                                      │
//! │  ├── Envelope Errors                                                   │
//! │  │   ├── UnsupportedVersion     - Unknown version / '#' encoding       │
//! │  │   └── MalformedEnvelope      - Bad base64 or impossible length      │
//! │  │                                                                      │
//! │  └── Content Errors                                                    │
//! │      ├── AuthenticationFailed   - MAC mismatch                         │
//! │      ├── PaddingInvalid         - Declared length vs padding mismatch  │
//! │      └── InvalidUtf8            - Plaintext is not UTF-8               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error is terminal for the call that produced it. Decryption never
//! returns partial output alongside an error.

use thiserror::Error;

/// Result type alias for envelope operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for envelope operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Key Errors (100-199)
    // ========================================================================

    /// Private scalar out of range, public key not on the curve, or an
    /// unparseable key encoding
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// HKDF rejected the requested output
    #[error("Failed to derive keys: {0}")]
    KeyDerivationFailed(String),

    // ========================================================================
    // Plaintext Errors (200-299)
    // ========================================================================

    /// Plaintext byte length outside the accepted range
    #[error("Invalid plaintext length: {0} bytes (must be 1..=65408)")]
    PlaintextLengthInvalid(usize),

    /// Random number generation failed
    #[error("Random number generation failed")]
    RngFailed,

    // ========================================================================
    // Envelope Errors (300-399)
    // ========================================================================

    /// Unknown version byte, or the reserved `#` encoding marker
    #[error("Unsupported envelope version: {0}")]
    UnsupportedVersion(String),

    /// Envelope text could not be decoded or has an impossible size
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    // ========================================================================
    // Content Errors (400-499)
    // ========================================================================

    /// MAC verification failed
    #[error("Authentication failed: MAC mismatch")]
    AuthenticationFailed,

    /// Declared plaintext length does not match the padding
    #[error("Invalid padding: {0}")]
    PaddingInvalid(String),

    /// Decrypted plaintext is not valid UTF-8
    #[error("Decrypted plaintext is not valid UTF-8")]
    InvalidUtf8,
}

impl Error {
    /// Get a stable numeric error code
    ///
    /// - 100-199: Keys
    /// - 200-299: Plaintext
    /// - 300-399: Envelope structure
    /// - 400-499: Authentication and content
    pub fn code(&self) -> i32 {
        match self {
            // Keys (100-199)
            Error::InvalidKeyMaterial(_) => 100,
            Error::KeyDerivationFailed(_) => 101,

            // Plaintext (200-299)
            Error::PlaintextLengthInvalid(_) => 200,
            Error::RngFailed => 201,

            // Envelope (300-399)
            Error::UnsupportedVersion(_) => 300,
            Error::MalformedEnvelope(_) => 301,

            // Content (400-499)
            Error::AuthenticationFailed => 400,
            Error::PaddingInvalid(_) => 401,
            Error::InvalidUtf8 => 402,
        }
    }

    /// Check if this error is recoverable
    ///
    /// Only a transient RNG failure can succeed on retry; every other
    /// error is a property of the inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::RngFailed)
    }
}

// ============================================================================
// ERROR CONVERSIONS
// ============================================================================

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::MalformedEnvelope(format!("invalid base64: {}", err))
    }
}

// ============================================================================
// TESTS
// ============================================================================
