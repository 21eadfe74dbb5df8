/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Error types and handling for the ApkTrust library.
//! "Does not verify" and "unsigned for a range" are valid outcomes, not
//! errors; they flow through the model as gaps and empty results.

use std::{fmt, io};

/// Comprehensive error type for all analysis operations.
#[derive(Debug)]
pub enum ApkError {
    /// I/O errors during file operations or process spawning
    Io(io::Error),
    /// A digest string is not hex of at least 32 characters
    UnsupportedDigestFormat(String),
    /// A hex digest has a length other than 32, 40 or 64
    UnsupportedDigestLength(usize),
    /// apksigner could not process the file at all
    MalformedPackage(String),
    /// A rotation lineage that cannot describe a rotation (single entry)
    InvalidLineage(String),
    /// apksigner output did not match any known shape
    Parse(String),
    /// Configuration or setup errors
    Config(String),
}

impl fmt::Display for ApkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApkError::Io(e) => write!(f, "I/O Error: {}", e),
            ApkError::UnsupportedDigestFormat(s) => {
                write!(f, "Digest Error: only hex digests are supported: {:?}", s)
            }
            ApkError::UnsupportedDigestLength(n) => {
                write!(f, "Digest Error: {}-length digest is not supported", n)
            }
            ApkError::MalformedPackage(s) => write!(f, "Malformed Package: {}", s),
            ApkError::InvalidLineage(s) => write!(f, "Lineage Error: {}", s),
            ApkError::Parse(s) => write!(f, "Parsing Error: {}", s),
            ApkError::Config(s) => write!(f, "Configuration Error: {}", s),
        }
    }
}

impl std::error::Error for ApkError {}

impl From<io::Error> for ApkError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
