//! Cryptography module for ecrypt
//!
//! Provides AES-GCM authenticated encryption with an explicit secret-key
//! lifecycle. Key material is zeroized as soon as its owner is done with it.

mod encryption;
mod keys;

#[cfg(test)]
pub(crate) mod test_util;

pub use encryption::{decrypt, encrypt, encrypt_with_rng};
pub use keys::{Key, KeySize};

/// Size of GCM nonce in bytes
pub const NONCE_SIZE: usize = 12;

/// Size of GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;
