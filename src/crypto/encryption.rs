//! AES-GCM Encryption Implementation
//!
//! All payloads are sealed with AES-GCM, which provides:
//! - Confidentiality: Data is encrypted
//! - Integrity: Any tampering is detected
//! - Authentication: Verifies the data came from the key holder
//!
//! The key length selects the AES variant (128/192/256-bit). The nonce is
//! always generated fresh inside [`encrypt`]; callers supply one only to
//! [`decrypt`], where it arrives alongside the ciphertext.

use crate::crypto::{KeySize, NONCE_SIZE};
use crate::error::{Error, Result};
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

/// AES-192-GCM (no upstream alias; built from the generic construction)
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Encrypt a payload using AES-GCM
///
/// Generates a fresh random nonce for this operation and seals the
/// plaintext with no additional authenticated data. The returned
/// ciphertext is the encrypted payload with the authentication tag
/// appended; an empty plaintext yields a tag-only ciphertext.
///
/// # Arguments
/// * `plaintext` - Data to encrypt
/// * `key` - Raw key bytes, 16/24/32 bytes long
///
/// # Returns
/// Ciphertext with appended tag, plus the nonce used (needed to decrypt)
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_SIZE])> {
    encrypt_with_rng(plaintext, key, &mut OsRng)
}

/// Encrypt using a caller-supplied CSPRNG for the nonce.
///
/// Exists so tests can inject a failing entropy source; production
/// callers go through [`encrypt`].
pub fn encrypt_with_rng<R>(
    plaintext: &[u8],
    key: &[u8],
    rng: &mut R,
) -> Result<(Vec<u8>, [u8; NONCE_SIZE])>
where
    R: RngCore + CryptoRng,
{
    // Reject bad keys before spending entropy on a nonce
    let size = KeySize::from_len(key.len()).ok_or(Error::InvalidKey)?;

    let mut nonce = [0u8; NONCE_SIZE];
    rng.try_fill_bytes(&mut nonce)
        .map_err(|e| Error::RandomSource(e.to_string()))?;

    let ciphertext = match size {
        KeySize::Aes128 => seal::<Aes128Gcm>(key, &nonce, plaintext),
        KeySize::Aes192 => seal::<Aes192Gcm>(key, &nonce, plaintext),
        KeySize::Aes256 => seal::<Aes256Gcm>(key, &nonce, plaintext),
    }?;

    Ok((ciphertext, nonce))
}

/// Decrypt a payload using AES-GCM
///
/// Verifies the authentication tag before returning any plaintext. A tag
/// mismatch, truncated ciphertext, or wrong key all surface as the single
/// opaque [`Error::AuthenticationFailure`]; a nonce of the wrong length is
/// reported separately so callers can tell malformed framing from
/// tampering.
///
/// # Arguments
/// * `ciphertext` - Encrypted payload with appended tag
/// * `nonce` - The nonce returned by [`encrypt`], exactly 12 bytes
/// * `key` - Raw key bytes, 16/24/32 bytes long
pub fn decrypt(ciphertext: &[u8], nonce: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let size = KeySize::from_len(key.len()).ok_or(Error::InvalidKey)?;

    if nonce.len() != NONCE_SIZE {
        return Err(Error::InvalidNonceSize {
            expected: NONCE_SIZE,
            got: nonce.len(),
        });
    }

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    nonce_bytes.copy_from_slice(nonce);

    match size {
        KeySize::Aes128 => open::<Aes128Gcm>(key, &nonce_bytes, ciphertext),
        KeySize::Aes192 => open::<Aes192Gcm>(key, &nonce_bytes, ciphertext),
        KeySize::Aes256 => open::<Aes256Gcm>(key, &nonce_bytes, ciphertext),
    }
}

fn seal<C>(key: &[u8], nonce: &[u8; NONCE_SIZE], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::InvalidKey)?;
    cipher
        .encrypt(Nonce::<U12>::from_slice(nonce), plaintext)
        .map_err(|_| Error::InvalidKey)
}

fn open<C>(key: &[u8], nonce: &[u8; NONCE_SIZE], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::InvalidKey)?;
    cipher
        .decrypt(Nonce::<U12>::from_slice(nonce), ciphertext)
        .map_err(|_| Error::AuthenticationFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::test_util::FailingRng;
    use crate::crypto::{Key, TAG_SIZE};

    #[test]
    fn test_encrypt_decrypt_all_key_sizes() {
        let plaintext = b"This is some test data to encrypt and decrypt";

        for size in [KeySize::Aes128, KeySize::Aes192, KeySize::Aes256] {
            let mut key = Key::generate(size).unwrap();
            let key_bytes = key.bytes().unwrap();

            let (ciphertext, nonce) = encrypt(plaintext, key_bytes).unwrap();
            assert_eq!(ciphertext.len(), plaintext.len() + TAG_SIZE);
            assert_ne!(&ciphertext[..plaintext.len()], plaintext.as_slice());

            let decrypted = decrypt(&ciphertext, &nonce, key_bytes).unwrap();
            assert_eq!(decrypted, plaintext);

            key.destroy();
        }
    }

    #[test]
    fn test_empty_plaintext() {
        let key = [0x42u8; 32];

        let (ciphertext, nonce) = encrypt(b"", &key).unwrap();
        assert_eq!(ciphertext.len(), TAG_SIZE);

        let decrypted = decrypt(&ciphertext, &nonce, &key).unwrap();
        assert!(decrypted.is_empty());
    }

    #[test]
    fn test_zero_key_hello() {
        let key = [0u8; 32];

        let (ciphertext, nonce) = encrypt(b"hello", &key).unwrap();
        assert_eq!(ciphertext.len(), 5 + TAG_SIZE);
        assert_eq!(nonce.len(), NONCE_SIZE);

        let decrypted = decrypt(&ciphertext, &nonce, &key).unwrap();
        assert_eq!(decrypted, b"hello");

        let mut bumped = nonce;
        bumped[NONCE_SIZE - 1] = bumped[NONCE_SIZE - 1].wrapping_add(1);
        match decrypt(&ciphertext, &bumped, &key) {
            Err(Error::AuthenticationFailure) => {}
            other => panic!("expected AuthenticationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = [0x11u8; 16];
        let (ciphertext, nonce) = encrypt(b"Secret data", &key).unwrap();

        // A single flipped bit anywhere, payload or tag, must break the seal
        for i in 0..ciphertext.len() {
            let mut tampered = ciphertext.clone();
            tampered[i] ^= 0x01;
            match decrypt(&tampered, &nonce, &key) {
                Err(Error::AuthenticationFailure) => {}
                other => panic!("byte {} flip: expected AuthenticationFailure, got {:?}", i, other),
            }
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let key = [0x11u8; 16];
        let (ciphertext, nonce) = encrypt(b"Secret data", &key).unwrap();

        let truncated = &ciphertext[..TAG_SIZE - 1];
        match decrypt(truncated, &nonce, &key) {
            Err(Error::AuthenticationFailure) => {}
            other => panic!("expected AuthenticationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_nonce_fails() {
        let key = [0x33u8; 24];
        let (ciphertext, nonce) = encrypt(b"Secret data", &key).unwrap();

        let mut other_nonce = [0u8; NONCE_SIZE];
        other_nonce.copy_from_slice(&nonce);
        other_nonce[0] ^= 0xFF;

        match decrypt(&ciphertext, &other_nonce, &key) {
            Err(Error::AuthenticationFailure) => {}
            other => panic!("expected AuthenticationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_key_fails() {
        let key1 = [0x01u8; 32];
        let key2 = [0x02u8; 32];
        let (ciphertext, nonce) = encrypt(b"Secret data", &key1).unwrap();

        match decrypt(&ciphertext, &nonce, &key2) {
            Err(Error::AuthenticationFailure) => {}
            other => panic!("expected AuthenticationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_key_length() {
        for len in [10usize, 15, 17, 23, 25, 31, 33] {
            let key = vec![0u8; len];

            match encrypt(b"data", &key) {
                Err(Error::InvalidKey) => {}
                other => panic!("encrypt len {}: expected InvalidKey, got {:?}", len, other),
            }

            match decrypt(&[0u8; 16], &[0u8; NONCE_SIZE], &key) {
                Err(Error::InvalidKey) => {}
                other => panic!("decrypt len {}: expected InvalidKey, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_invalid_nonce_length() {
        let key = [0u8; 32];
        let (ciphertext, _) = encrypt(b"data", &key).unwrap();

        for len in [11usize, 13] {
            match decrypt(&ciphertext, &vec![0u8; len], &key) {
                Err(Error::InvalidNonceSize { expected, got }) => {
                    assert_eq!(expected, NONCE_SIZE);
                    assert_eq!(got, len);
                }
                other => panic!("nonce len {}: expected InvalidNonceSize, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_encryption_is_non_deterministic() {
        let key = [0x55u8; 32];
        let plaintext = b"same plaintext, same key";

        let (c1, n1) = encrypt(plaintext, &key).unwrap();
        let (c2, n2) = encrypt(plaintext, &key).unwrap();

        assert_ne!(n1, n2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_entropy_failure() {
        let key = [0u8; 32];

        match encrypt_with_rng(b"data", &key, &mut FailingRng) {
            Err(Error::RandomSource(_)) => {}
            other => panic!("expected RandomSource, got {:?}", other),
        }
    }
}
