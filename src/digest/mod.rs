//! Digest Module
//!
//! Closed-set digest dispatch over base64 payloads.

mod algorithm;
mod dispatcher;

pub use algorithm::HashAlgorithm;
pub use dispatcher::{digest, DigestDispatcher, StandardDispatcher};
