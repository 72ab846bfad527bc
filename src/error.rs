//! Error types for ecrypt

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for ecrypt
#[derive(Error, Debug)]
pub enum Error {
    // Crypto errors
    #[error("invalid key size: expected 16, 24, or 32 bytes, got {got}")]
    InvalidKeySize { got: usize },

    #[error("key rejected by cipher")]
    InvalidKey,

    #[error("invalid nonce size: expected {expected} bytes, got {got}")]
    InvalidNonceSize { expected: usize, got: usize },

    // Deliberately opaque: does not say whether the key, nonce, or
    // ciphertext was at fault.
    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("random source failure: {0}")]
    RandomSource(String),

    // CLI errors
    #[error("environment variable {0} is not set or empty")]
    KeyEnvVar(String),

    #[error("hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
