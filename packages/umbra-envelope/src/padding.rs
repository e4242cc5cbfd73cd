//! # Padding
//!
//! Length-hiding padding for plaintexts.
//!
//! ```text
//! ┌──────────────┬──────────────────────────┬───────────────────────────┐
//! │ len (u16 BE) │ UTF-8 plaintext (len)    │ zeros up to pad(len)      │
//! └──────────────┴──────────────────────────┴───────────────────────────┘
//!   2 bytes        len bytes                  pad(len) - len bytes
//! ```
//!
//! `pad(len)` rounds up to 32 bytes for short messages and to one eighth of
//! the next power of two above that, so the number of distinguishable
//! length buckets grows logarithmically:
//!
//! | unpadded | padded |
//! |----------|--------|
//! | 1..=32 | 32 |
//! | 33..=64 | 64 |
//! | 65..=96 | 96 |
//! | 100 | 128 |
//! | 1020 | 1024 |
//! | 74123 | 81920 |

use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};

/// Smallest plaintext accepted, in bytes
pub const MIN_PLAINTEXT_SIZE: usize = 1;

/// Largest plaintext accepted, in bytes
pub const MAX_PLAINTEXT_SIZE: usize = 0x10000 - 128;

/// Smallest padded length
pub const MIN_PADDED_LEN: usize = 32;

/// Size of the big-endian length prefix
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Padded length for an unpadded byte length
///
/// Total over all inputs; lengths up to 32 (including 0) map to 32. Lengths
/// whose bucket would exceed `usize::MAX` saturate to `usize::MAX`.
pub fn calc_padded_len(unpadded_len: usize) -> usize {
    if unpadded_len <= MIN_PADDED_LEN {
        return MIN_PADDED_LEN;
    }

    let prev = unpadded_len - 1;
    // Smallest power of two above `prev`; past the top bit the chunk is 2^BITS / 8
    let chunk = match unpadded_len.checked_next_power_of_two() {
        Some(next_power) if next_power <= 256 => 32,
        Some(next_power) => next_power / 8,
        None => 1usize << (usize::BITS - 3),
    };

    chunk.checked_mul(prev / chunk + 1).unwrap_or(usize::MAX)
}

/// Check a plaintext byte length against the accepted range
pub fn check_plaintext_len(len: usize) -> Result<()> {
    if !(MIN_PLAINTEXT_SIZE..=MAX_PLAINTEXT_SIZE).contains(&len) {
        return Err(Error::PlaintextLengthInvalid(len));
    }
    Ok(())
}

/// Build the padded plaintext for `plaintext`
///
/// The buffer is wiped when dropped.
pub fn pad(plaintext: &str) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = plaintext.as_bytes();
    check_plaintext_len(bytes.len())?;

    let padded_len = calc_padded_len(bytes.len());
    let mut out = Zeroizing::new(Vec::with_capacity(LENGTH_PREFIX_SIZE + padded_len));

    // Range-checked above, fits in u16
    out.extend_from_slice(&(bytes.len() as u16).to_be_bytes());
    out.extend_from_slice(bytes);
    out.resize(LENGTH_PREFIX_SIZE + padded_len, 0);

    Ok(out)
}

/// Recover the plaintext from a padded buffer
///
/// Fails with [`Error::PaddingInvalid`] when the declared length is zero,
/// overruns the buffer, or disagrees with the buffer's padded size, and with
/// [`Error::InvalidUtf8`] when the bytes are not UTF-8. No partial output is
/// returned on failure.
pub fn unpad(padded: &[u8]) -> Result<String> {
    if padded.len() < LENGTH_PREFIX_SIZE {
        return Err(Error::PaddingInvalid("missing length prefix".into()));
    }

    let declared = u16::from_be_bytes([padded[0], padded[1]]) as usize;
    if declared == 0 {
        return Err(Error::PaddingInvalid("declared length is zero".into()));
    }

    let end = LENGTH_PREFIX_SIZE + declared;
    if end > padded.len() {
        return Err(Error::PaddingInvalid("declared length exceeds buffer".into()));
    }

    if padded.len() != LENGTH_PREFIX_SIZE + calc_padded_len(declared) {
        return Err(Error::PaddingInvalid(
            "padded size does not match declared length".into(),
        ));
    }

    String::from_utf8(padded[LENGTH_PREFIX_SIZE..end].to_vec()).map_err(|e| {
        e.into_bytes().zeroize();
        Error::InvalidUtf8
    })
}

// ============================================================================
// TESTS
// ============================================================================
