/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Classification of certificate digest strings by their hex length.

use crate::error::ApkError;

/// The hash algorithm behind a certificate digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Md5,
    Sha1,
    Sha256,
}

impl DigestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DigestKind::Md5 => "md5",
            DigestKind::Sha1 => "sha1",
            DigestKind::Sha256 => "sha256",
        }
    }
}

/// Classify a hex digest string by length: 32 is MD5, 40 is SHA-1, 64 is
/// SHA-256. Anything that is not pure hex of at least 32 characters is
/// rejected as a tooling invariant violation.
pub fn classify(digest: &str) -> Result<DigestKind, ApkError> {
    if digest.len() < 32 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ApkError::UnsupportedDigestFormat(digest.to_string()));
    }

    match digest.len() {
        32 => Ok(DigestKind::Md5),
        40 => Ok(DigestKind::Sha1),
        64 => Ok(DigestKind::Sha256),
        n => Err(ApkError::UnsupportedDigestLength(n)),
    }
}
