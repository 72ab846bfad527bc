//! ecrypt - Authenticated file encryption
//!
//! This library provides AES-GCM authenticated encryption of opaque byte
//! payloads together with a secret-key lifecycle that keeps raw key
//! material resident in memory for as short a window as possible.

pub mod crypto;
pub mod error;

pub use crypto::{decrypt, encrypt, Key, KeySize, NONCE_SIZE, TAG_SIZE};
pub use error::{Error, Result};
