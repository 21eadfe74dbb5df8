/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Certificate-rotation lineage: the ordered history of signing
//! certificates a package has used, oldest to newest, with the capability
//! flags granted to each superseded certificate.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApkError;
use crate::fingerprint::Fingerprint;

/// `Has <name> capability: true|false` lines of `apksigner lineage`.
static CAPABILITY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Has\s(.+)\scapability\s*:\s*(true|false)\s*$").expect("valid regex")
});

/// Capability flags a lineage entry grants to its (old) certificate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub installed_data: bool,
    pub shared_uid: bool,
    pub permission: bool,
    pub rollback: bool,
    pub auth: bool,
}

/// One step of a rotation history. Entry *i* was superseded by entry *i+1*.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineageEntry {
    pub fingerprint: Fingerprint,
    pub capabilities: Capabilities,
}

/// Reports the raw signer hunks of a package's rotation history. Zero hunks
/// means the package was never rotated (or is unsigned).
pub trait LineageReader {
    fn lineage(&self, path: &Path) -> Result<Vec<Vec<String>>, ApkError>;
}

/// Read and parse the rotation lineage of the given package, oldest signer
/// first.
pub fn read(reader: &dyn LineageReader, path: &Path) -> Result<Vec<LineageEntry>, ApkError> {
    let hunks = reader.lineage(path)?;
    hunks.iter().map(|lines| parse_entry(lines)).collect()
}

fn parse_entry(lines: &[String]) -> Result<LineageEntry, ApkError> {
    let mut entry = LineageEntry::default();

    for line in lines {
        if entry.fingerprint.apply_digest_line(line)? {
            continue;
        }
        if let Some(captures) = CAPABILITY_LINE.captures(line) {
            let enabled = captures[2].eq_ignore_ascii_case("true");
            match captures[1].to_ascii_lowercase().as_str() {
                "installed data" => entry.capabilities.installed_data = enabled,
                "shared uid" => entry.capabilities.shared_uid = enabled,
                "permission" => entry.capabilities.permission = enabled,
                "rollback" => entry.capabilities.rollback = enabled,
                "auth" => entry.capabilities.auth = enabled,
                // Future platform capabilities pass through unmodeled.
                _ => {}
            }
        }
    }

    Ok(entry)
}
