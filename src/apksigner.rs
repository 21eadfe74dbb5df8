/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Adapter around the platform `apksigner` tool. Everything above this
//! module sees only the [`SigningVerifier`] and [`LineageReader`] traits;
//! process spawning and stdout splitting live here.

use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ApkError;
use crate::fingerprint::SdkRange;
use crate::lineage::LineageReader;
use crate::verifier::{SignerHunk, SigningVerifier};

/// `(minSdkVersion=N, maxSdkVersion=M)` markers in ranged verify output.
static TARGET_SDK_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(minSdkVersion=(\d+),\s*maxSdkVersion=(\d+)\)").expect("valid regex")
});

/// `Signer #N ...` heading of a numbered signer block.
static SIGNER_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Signer\s#(\d+)\s").expect("valid regex"));

/// Invokes `apksigner` from PATH (or a custom location) as a stateless
/// query per call.
pub struct ApkSigner {
    command: String,
}

impl ApkSigner {
    pub fn new() -> Self {
        Self {
            command: "apksigner".into(),
        }
    }

    /// Use a specific apksigner executable instead of resolving from PATH.
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for ApkSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl SigningVerifier for ApkSigner {
    fn print_certs(
        &self,
        path: &Path,
        min_sdk: i32,
        max_sdk: i32,
    ) -> Result<Vec<SignerHunk>, ApkError> {
        // Never pass -v here; it would print public keys too.
        let output = Command::new(&self.command)
            .arg("verify")
            .arg("--min-sdk-version")
            .arg(min_sdk.to_string())
            .arg("--max-sdk-version")
            .arg(max_sdk.to_string())
            .arg("--print-certs")
            .arg(path)
            .output()?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            return split_verify_hunks(&stdout, min_sdk, max_sdk);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.to_lowercase().contains("does not verify") {
            // A valid absence of signature for this range, not an error.
            Ok(Vec::new())
        } else {
            Err(ApkError::MalformedPackage(format!(
                "apksigner could not process {}",
                path.display()
            )))
        }
    }
}

impl LineageReader for ApkSigner {
    fn lineage(&self, path: &Path) -> Result<Vec<Vec<String>>, ApkError> {
        let output = Command::new(&self.command)
            .arg("lineage")
            .arg("--in")
            .arg(path)
            .arg("--print-certs")
            .output()?;

        // apksigner fails on packages without a lineage; that is "never
        // rotated", not an error.
        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(split_lineage_hunks(&stdout))
        } else {
            Ok(Vec::new())
        }
    }
}

/// Split `apksigner verify --print-certs` stdout into per-range signer
/// hunks. Newer apksigner annotates each line with the SDK sub-range it
/// applies to; older output carries exactly one unnumbered signer spanning
/// the queried range.
pub fn split_verify_hunks(
    stdout: &str,
    min_sdk: i32,
    max_sdk: i32,
) -> Result<Vec<SignerHunk>, ApkError> {
    let lines: Vec<&str> = stdout
        .lines()
        .filter(|line| !line.contains("WARNING") && !line.contains("DN: CN"))
        .collect();

    let Some(first) = lines.first() else {
        return Ok(Vec::new());
    };

    if first.contains("minSdkVersion=") {
        let mut hunks: Vec<SignerHunk> = Vec::new();
        for line in &lines {
            let Some(captures) = TARGET_SDK_PART.captures(line) else {
                continue;
            };
            let range = SdkRange::new(
                parse_sdk(&captures[1])?,
                parse_sdk(&captures[2])?,
            );
            match hunks.iter_mut().find(|hunk| hunk.range == range) {
                Some(hunk) => hunk.lines.push(line.to_string()),
                None => hunks.push(SignerHunk {
                    range,
                    lines: vec![line.to_string()],
                }),
            }
        }
        Ok(hunks)
    } else {
        for line in &lines {
            if let Some(captures) = SIGNER_INDEX.captures(line) {
                if captures[1].parse::<u32>().unwrap_or(0) >= 2 {
                    return Err(ApkError::Parse(format!(
                        "{} but multiple signers are not supported",
                        line.trim()
                    )));
                }
            }
        }

        Ok(vec![SignerHunk {
            range: SdkRange::new(min_sdk, max_sdk),
            lines: lines.iter().map(|line| line.to_string()).collect(),
        }])
    }
}

/// Split `apksigner lineage --print-certs` stdout into one hunk per signer,
/// oldest first. Distinguished-name lines are dropped; capability lines are
/// kept.
pub fn split_lineage_hunks(stdout: &str) -> Vec<Vec<String>> {
    let mut signers: Vec<Vec<String>> = Vec::new();
    let mut index = 0usize;

    for line in stdout.lines() {
        if let Some(captures) = SIGNER_INDEX.captures(line) {
            if let Ok(number) = captures[1].parse::<usize>() {
                if number >= 1 {
                    index = number - 1;
                }
            }
        }

        while signers.len() <= index {
            signers.push(Vec::new());
        }

        if line.starts_with("Has") || !line.contains("DN: CN") {
            signers[index].push(line.to_string());
        }
    }

    signers.into_iter().filter(|hunk| !hunk.is_empty()).collect()
}

fn parse_sdk(digits: &str) -> Result<i32, ApkError> {
    digits
        .parse::<i32>()
        .map_err(|_| ApkError::Parse(format!("SDK version out of range: {}", digits)))
}
