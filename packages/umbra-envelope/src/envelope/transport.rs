//! # Transport Encoding
//!
//! Envelopes travel as standard, padded base64 (RFC 4648 §4).
//!
//! A leading `#` marks a non-standard encoding that this crate does not
//! implement. It is rejected as an unsupported version and never parsed.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::{Envelope, MAX_ENVELOPE_SIZE, MIN_ENVELOPE_SIZE};
use crate::error::{Error, Result};

/// Reserved first character for a non-standard encoding
pub const SENTINEL: char = '#';

/// Encoded length of the smallest valid envelope (132)
pub const MIN_ENCODED_LEN: usize = MIN_ENVELOPE_SIZE.div_ceil(3) * 4;

/// Encoded length of the largest valid envelope (87472)
pub const MAX_ENCODED_LEN: usize = MAX_ENVELOPE_SIZE.div_ceil(3) * 4;

/// Encode an envelope as transport text
pub fn encode(envelope: &Envelope) -> String {
    STANDARD.encode(envelope.to_bytes())
}

/// Decode transport text into an envelope
///
/// Order of checks: the `#` sentinel, the encoded length ceiling, base64
/// validity, then the envelope's own version and size checks.
pub fn decode(text: &str) -> Result<Envelope> {
    if text.starts_with(SENTINEL) {
        return Err(Error::UnsupportedVersion(
            "non-standard '#' encoding is not supported".into(),
        ));
    }

    if text.len() > MAX_ENCODED_LEN {
        return Err(Error::MalformedEnvelope(format!(
            "encoded envelope too long: {} characters (max {})",
            text.len(),
            MAX_ENCODED_LEN
        )));
    }

    let bytes = STANDARD.decode(text)?;
    tracing::trace!(encoded_len = text.len(), decoded_len = bytes.len(), "Decoded envelope text");

    Envelope::from_bytes(&bytes)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{ConversationKey, Salt};

    fn sample() -> Envelope {
        let key = ConversationKey::from_bytes([42u8; 32]);
        Envelope::seal(&key, "transport", Salt::from_bytes([7u8; 32])).unwrap()
    }

    #[test]
    fn test_encoded_length_bounds() {
        assert_eq!(MIN_ENCODED_LEN, 132);
        assert_eq!(MAX_ENCODED_LEN, 87472);
        assert_eq!(encode(&sample()).len(), MIN_ENCODED_LEN);
    }

    #[test]
    fn test_encode_decode() {
        let envelope = sample();
        let text = encode(&envelope);
        assert!(text.starts_with('A'));
        assert_eq!(decode(&text).unwrap(), envelope);
    }

    #[test]
    fn test_sentinel_rejected_as_version() {
        let text = format!("#{}", encode(&sample()));
        assert!(matches!(decode(&text), Err(Error::UnsupportedVersion(_))));
        assert!(matches!(decode("#"), Err(Error::UnsupportedVersion(_))));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(decode("not base64!"), Err(Error::MalformedEnvelope(_))));

        // Missing padding is not accepted
        let text = encode(&sample());
        let unpadded = text.trim_end_matches('=');
        if unpadded.len() != text.len() {
            assert!(matches!(decode(unpadded), Err(Error::MalformedEnvelope(_))));
        }
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(matches!(decode(""), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_overlong_text_rejected() {
        let text = "A".repeat(MAX_ENCODED_LEN + 4);
        assert!(matches!(decode(&text), Err(Error::MalformedEnvelope(_))));
    }
}
