//! Umbra Envelope CLI
//!
//! Seal and open message envelopes from the terminal:
//!
//! 1. **Keys**: derive the x-only public key for a secret, or the
//!    conversation key shared with a peer.
//!
//! 2. **Messages**: encrypt a message for a peer or decrypt one from them.
//!    Messages and payloads are read from stdin when not given inline.
//!
//! 3. **Inspection**: show the layout of a payload without any keys.
//!
//! Secret keys are best passed through `UMBRA_SECRET_KEY` so they stay out
//! of shell history. Results go to stdout and logs go to stderr.

use std::fmt;
use std::io::{self, Read};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use umbra_envelope::envelope::transport;
use umbra_envelope::padding::{calc_padded_len, check_plaintext_len, LENGTH_PREFIX_SIZE};
use umbra_envelope::{ConversationKey, PublicKey, Salt, SecretKey};

// ── CLI Arguments ─────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "umbra-envelope",
    version,
    about = "Seal and open Umbra message envelopes"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the x-only public key for a secret key
    Pubkey {
        #[command(flatten)]
        secret: SecretArg,
    },

    /// Print the conversation key shared with a peer
    ConversationKey {
        #[command(flatten)]
        secret: SecretArg,
        #[command(flatten)]
        peer: PeerArg,
    },

    /// Encrypt a message for a peer
    Encrypt {
        #[command(flatten)]
        secret: SecretArg,
        #[command(flatten)]
        peer: PeerArg,

        /// Fixed 32-byte salt as hex. Only for reproducing test vectors.
        #[arg(long)]
        salt: Option<String>,

        /// Message text; read from stdin when omitted
        message: Option<String>,
    },

    /// Decrypt a payload from a peer
    Decrypt {
        #[command(flatten)]
        secret: SecretArg,
        #[command(flatten)]
        peer: PeerArg,

        /// Base64 payload; read from stdin when omitted
        payload: Option<String>,
    },

    /// Show the layout of a payload without decrypting it
    Inspect {
        /// Base64 payload; read from stdin when omitted
        payload: Option<String>,
    },

    /// Print the padded length for a plaintext of the given byte length
    PadLen {
        /// Plaintext length in bytes
        len: usize,
    },
}

#[derive(clap::Args)]
struct SecretArg {
    /// Local secret key as 64 hex characters
    #[arg(long, env = "UMBRA_SECRET_KEY", hide_env_values = true)]
    secret: String,
}

impl fmt::Debug for SecretArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretArg([REDACTED])")
    }
}

impl SecretArg {
    fn parse(&self) -> color_eyre::Result<SecretKey> {
        SecretKey::from_hex(&self.secret).wrap_err("invalid secret key")
    }
}

#[derive(clap::Args, Debug)]
struct PeerArg {
    /// Peer x-only public key as 64 hex characters
    #[arg(long, env = "UMBRA_PEER_PUBKEY")]
    peer: String,
}

impl PeerArg {
    fn parse(&self) -> color_eyre::Result<PublicKey> {
        PublicKey::from_hex(&self.peer).wrap_err("invalid peer public key")
    }
}

/// Log filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "umbra_envelope=info";

// ── Entry Point ───────────────────────────────────────────────────────────────

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let args = Args::parse();
    let output = run(args.command, &mut io::stdin())?;
    println!("{}", output);

    Ok(())
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run(command: Command, stdin: &mut impl Read) -> color_eyre::Result<String> {
    match command {
        Command::Pubkey { secret } => Ok(secret.parse()?.public_key().to_hex()),

        Command::ConversationKey { secret, peer } => {
            let key = ConversationKey::derive(&secret.parse()?, &peer.parse()?);
            Ok(hex::encode(key.as_bytes()))
        }

        Command::Encrypt {
            secret,
            peer,
            salt,
            message,
        } => {
            let secret = secret.parse()?;
            let peer = peer.parse()?;
            let message = input_or_stdin(message, stdin)?;

            let payload = match salt {
                Some(salt) => {
                    tracing::warn!("Encrypting with a fixed salt");
                    let key = ConversationKey::derive(&secret, &peer);
                    umbra_envelope::encrypt_with_salt(&key, &message, parse_salt(&salt)?)?
                }
                None => umbra_envelope::encrypt(&secret, &peer, &message)?,
            };
            tracing::debug!(len = payload.len(), "Encrypted message");
            Ok(payload)
        }

        Command::Decrypt {
            secret,
            peer,
            payload,
        } => {
            let payload = input_or_stdin(payload, stdin)?;
            let plaintext = umbra_envelope::decrypt(&secret.parse()?, &peer.parse()?, &payload)?;
            Ok(plaintext)
        }

        Command::Inspect { payload } => {
            let payload = input_or_stdin(payload, stdin)?;
            let envelope = transport::decode(&payload)?;
            let padded = envelope.ciphertext().len() - LENGTH_PREFIX_SIZE;

            Ok(format!(
                "version:    {}\nsalt:       {}\nciphertext: {} bytes ({} padded)\nmac:        {}",
                envelope.version().as_byte(),
                hex::encode(envelope.salt().as_bytes()),
                envelope.ciphertext().len(),
                padded,
                hex::encode(envelope.mac()),
            ))
        }

        Command::PadLen { len } => {
            check_plaintext_len(len)?;
            Ok(calc_padded_len(len).to_string())
        }
    }
}

/// Inline value if given, otherwise stdin with the trailing newline removed
fn input_or_stdin(value: Option<String>, stdin: &mut impl Read) -> color_eyre::Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }

    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .wrap_err("failed to read stdin")?;

    let trimmed = buf.strip_suffix('\n').unwrap_or(&buf);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

fn parse_salt(s: &str) -> color_eyre::Result<Salt> {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(s.trim(), &mut bytes)
        .map_err(|e| eyre!("salt must be 32 bytes of hex: {}", e))?;
    Ok(Salt::from_bytes(bytes))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
