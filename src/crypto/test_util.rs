//! Test helpers for the crypto module

use rand::{CryptoRng, Error, RngCore};
use std::io;

/// A random source whose fallible interface always reports exhaustion.
pub(crate) struct FailingRng;

impl RngCore for FailingRng {
    fn next_u32(&mut self) -> u32 {
        panic!("FailingRng cannot produce bytes")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("FailingRng cannot produce bytes")
    }

    fn fill_bytes(&mut self, _dest: &mut [u8]) {
        panic!("FailingRng cannot produce bytes")
    }

    fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), Error> {
        Err(Error::new(io::Error::new(
            io::ErrorKind::Other,
            "entropy source exhausted",
        )))
    }
}

impl CryptoRng for FailingRng {}
