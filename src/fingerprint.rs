/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Certificate fingerprints and the SDK ranges they are effective for.

use std::sync::LazyLock;

use regex::Regex;

use crate::digest::{self, DigestKind};
use crate::error::ApkError;

/// `Signer ... <algo> digest: <hex>` lines shared by `apksigner verify
/// --print-certs` and `apksigner lineage --print-certs`.
static SIGNER_DIGEST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^Signer\s.+(?:MD5|SHA-?1|SHA-?256)\sdigest:\s([0-9a-fA-F]{32,})\s*$")
        .expect("valid regex")
});

/// A signing certificate identified by up to three hash digests, all
/// lowercase hex. A fingerprint with no digest at all means "unsigned".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fingerprint {
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub sha256: Option<String>,
}

impl Fingerprint {
    pub fn digest(&self, kind: DigestKind) -> Option<&str> {
        match kind {
            DigestKind::Md5 => self.md5.as_deref(),
            DigestKind::Sha1 => self.sha1.as_deref(),
            DigestKind::Sha256 => self.sha256.as_deref(),
        }
    }

    pub fn set_digest(&mut self, kind: DigestKind, value: String) {
        match kind {
            DigestKind::Md5 => self.md5 = Some(value),
            DigestKind::Sha1 => self.sha1 = Some(value),
            DigestKind::Sha256 => self.sha256 = Some(value),
        }
    }

    /// Fold one line of apksigner output into this fingerprint. Returns
    /// `true` if the line carried a certificate digest. A matched digest
    /// that fails classification is a tooling invariant violation.
    pub fn apply_digest_line(&mut self, line: &str) -> Result<bool, ApkError> {
        let Some(captures) = SIGNER_DIGEST_LINE.captures(line) else {
            return Ok(false);
        };
        let hex = captures[1].to_ascii_lowercase();
        let kind = digest::classify(&hex)?;
        self.set_digest(kind, hex);
        Ok(true)
    }

    /// True when no digest is known, i.e. the span is unsigned or
    /// unverifiable.
    pub fn is_absent(&self) -> bool {
        self.md5.is_none() && self.sha1.is_none() && self.sha256.is_none()
    }

    /// Compare two fingerprints on the strongest digest kind both sides
    /// carry. Older tooling may only emit SHA-1, so full multi-digest
    /// equality would wrongly reject identical certificates.
    pub fn matches(&self, other: &Fingerprint) -> bool {
        for kind in [DigestKind::Sha256, DigestKind::Sha1, DigestKind::Md5] {
            if let (Some(a), Some(b)) = (self.digest(kind), other.digest(kind)) {
                return a == b;
            }
        }
        false
    }
}

/// An inclusive band of platform API levels. `max_sdk == i32::MAX` means
/// "this and all future versions".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdkRange {
    pub min_sdk: i32,
    pub max_sdk: i32,
}

impl SdkRange {
    pub fn new(min_sdk: i32, max_sdk: i32) -> Self {
        Self { min_sdk, max_sdk }
    }

    pub fn contains(&self, sdk: i32) -> bool {
        self.min_sdk <= sdk && sdk <= self.max_sdk
    }
}

/// One certificate effective across one band of API levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintRecord {
    pub range: SdkRange,
    pub fingerprint: Fingerprint,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sha1_only(hex: &str) -> Fingerprint {
        Fingerprint {
            sha1: Some(hex.to_string()),
            ..Fingerprint::default()
        }
    }

    #[test]
    fn absent_means_no_digest_at_all() {
        assert!(Fingerprint::default().is_absent());
        assert!(!sha1_only("4ad4e4376face4e441a3b8802363a7f6c6b458ab").is_absent());
    }

    #[test]
    fn matches_on_strongest_common_digest() {
        let full = Fingerprint {
            md5: Some("b45d97c0330628008c56837ad9612103".into()),
            sha1: Some("4ad4e4376face4e441a3b8802363a7f6c6b458ab".into()),
            sha256: Some(
                "901ee5b342ed8c0552196f9347c009e2864af44ac0e77ab7f4cca431d1692119".into(),
            ),
        };
        // Legacy tooling knows only the SHA-1; still the same certificate.
        assert!(full.matches(&sha1_only("4ad4e4376face4e441a3b8802363a7f6c6b458ab")));
        assert!(!full.matches(&sha1_only("e9d0dd023bdab7fae9479d1ecbb3275e0fccac20")));
    }

    #[test]
    fn no_common_digest_kind_never_matches() {
        let md5_only = Fingerprint {
            md5: Some("b45d97c0330628008c56837ad9612103".into()),
            ..Fingerprint::default()
        };
        assert!(!md5_only.matches(&sha1_only("4ad4e4376face4e441a3b8802363a7f6c6b458ab")));
        assert!(!Fingerprint::default().matches(&Fingerprint::default()));
    }

    #[test]
    fn digest_lines_accumulate_into_one_fingerprint() {
        let mut fingerprint = Fingerprint::default();
        assert!(fingerprint
            .apply_digest_line(
                "Signer #1 certificate SHA-256 digest: 901EE5B342ED8C0552196F9347C009E2864AF44AC0E77AB7F4CCA431D1692119"
            )
            .unwrap());
        assert!(fingerprint
            .apply_digest_line(
                "Signer (minSdkVersion=24, maxSdkVersion=32) certificate SHA-1 digest: 4ad4e4376face4e441a3b8802363a7f6c6b458ab"
            )
            .unwrap());
        assert!(!fingerprint
            .apply_digest_line("Verified using v2 scheme (APK Signature Scheme v2): true")
            .unwrap());
        assert_eq!(
            fingerprint.sha256.as_deref(),
            Some("901ee5b342ed8c0552196f9347c009e2864af44ac0e77ab7f4cca431d1692119")
        );
        assert_eq!(
            fingerprint.sha1.as_deref(),
            Some("4ad4e4376face4e441a3b8802363a7f6c6b458ab")
        );
        assert!(fingerprint.md5.is_none());
    }

    #[test]
    fn range_containment_is_inclusive() {
        let range = SdkRange::new(24, 32);
        assert!(range.contains(24));
        assert!(range.contains(32));
        assert!(!range.contains(33));
        assert!(!range.contains(23));
    }
}
