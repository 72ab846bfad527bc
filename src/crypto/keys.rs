//! Secret-key lifecycle for ecrypt
//!
//! A [`Key`] owns its material and keeps it readable for as short a window
//! as possible: the buffer is wrapped in [`Zeroizing`] so it is overwritten
//! on drop, and [`Key::destroy`] clears it early once the owner is done.

use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

/// Valid AES key sizes.
///
/// AES accepts exactly three key lengths; every other length is rejected
/// before any cryptographic work runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 128-bit key (16 bytes)
    Aes128,
    /// 192-bit key (24 bytes)
    Aes192,
    /// 256-bit key (32 bytes)
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub const fn len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    /// Map a byte length to a key size. Returns `None` for any length
    /// other than 16, 24 or 32.
    pub const fn from_len(len: usize) -> Option<KeySize> {
        match len {
            16 => Some(KeySize::Aes128),
            24 => Some(KeySize::Aes192),
            32 => Some(KeySize::Aes256),
            _ => None,
        }
    }
}

/// A fixed-size secret key.
///
/// The key is the sole owner of its material: construction copies the
/// caller's bytes, and no accessor hands out an owned copy. `Clone` is
/// deliberately not implemented, and `Debug` is redacted.
pub struct Key {
    material: Option<Zeroizing<Vec<u8>>>,
}

impl Key {
    /// Generate a fresh random key of the given size from the OS CSPRNG.
    pub fn generate(size: KeySize) -> Result<Self> {
        Self::generate_with_rng(size, &mut OsRng)
    }

    /// Generate a key using a caller-supplied CSPRNG.
    ///
    /// Exists so tests can inject a failing entropy source; production
    /// callers go through [`Key::generate`]. On failure no key material
    /// is exposed.
    pub fn generate_with_rng<R>(size: KeySize, rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng,
    {
        let mut material = Zeroizing::new(vec![0u8; size.len()]);
        rng.try_fill_bytes(&mut material)
            .map_err(|e| Error::RandomSource(e.to_string()))?;

        Ok(Key {
            material: Some(material),
        })
    }

    /// Wrap a copy of the caller's bytes as a key.
    ///
    /// The bytes are copied, never aliased: destroying this key leaves the
    /// caller's buffer untouched and vice versa.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if KeySize::from_len(bytes.len()).is_none() {
            return Err(Error::InvalidKeySize { got: bytes.len() });
        }

        Ok(Key {
            material: Some(Zeroizing::new(bytes.to_vec())),
        })
    }

    /// Borrow the key material, or `None` once the key has been destroyed.
    ///
    /// The borrow must not be held across a call to [`Key::destroy`];
    /// the borrow checker enforces this for safe callers.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.material.as_ref().map(|m| m.as_slice())
    }

    /// Size of the key, while alive.
    pub fn size(&self) -> Option<KeySize> {
        self.bytes().and_then(|b| KeySize::from_len(b.len()))
    }

    /// Overwrite the material with zeros and mark the key unusable.
    ///
    /// Subsequent [`Key::bytes`] calls return `None`. Calling this on an
    /// already-destroyed key is a no-op. A key that is dropped without an
    /// explicit `destroy()` is zeroized on drop as well.
    pub fn destroy(&mut self) {
        // The Zeroizing wrapper overwrites the buffer when the taken
        // value drops at the end of this statement.
        self.material.take();
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("material", &"<redacted>")
            .field("destroyed", &self.material.is_none())
            .finish()
    }
}
