//! Digest Dispatcher Module
//!
//! Maps an algorithm identifier and a base64 payload to a lowercase hex digest.

use std::str::FromStr;

use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::digest::HashAlgorithm;
use crate::error::{Result, WorkerError};

/// Standard alphabet with required padding. Non-zero trailing bits in the
/// last symbol are tolerated, so `aGVsbG9=` decodes like `aGVsbG8=`.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// Decodes `payload` from standard base64 and hashes it with `algorithm`.
///
/// Line breaks (`\r`, `\n`) inside the payload are ignored, which accepts the
/// wrapped output of tools such as `base64`.
///
/// Decoding happens before the algorithm lookup, so a bad payload is always
/// reported as [`WorkerError::InvalidEncoding`] and never reaches a hasher.
pub fn digest(algorithm: &str, payload: &str) -> Result<String> {
    let data = decode_payload(payload)?;

    let algorithm = HashAlgorithm::from_str(algorithm)?;
    Ok(hex::encode(algorithm.hash(&data)))
}

fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let result = if payload.contains(['\r', '\n']) {
        let unwrapped: String = payload.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        PAYLOAD_ENGINE.decode(unwrapped)
    } else {
        PAYLOAD_ENGINE.decode(payload)
    };
    result.map_err(|e| WorkerError::InvalidEncoding(e.to_string()))
}

// == Dispatcher Trait ==
/// Seam between the worker loop and the hashing code.
pub trait DigestDispatcher: Send + Sync {
    fn digest(&self, algorithm: &str, payload: &str) -> Result<String>;
}

/// Production dispatcher backed by [`digest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDispatcher;

impl DigestDispatcher for StandardDispatcher {
    fn digest(&self, algorithm: &str, payload: &str) -> Result<String> {
        digest(algorithm, payload)
    }
}
