/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! The reconciled signing identity of one APK: certificate fingerprints per
//! SDK range plus the rotation lineage, built once per analyzed package and
//! immutable afterwards.

use std::path::Path;

use crate::apksigner::ApkSigner;
use crate::digest::DigestKind;
use crate::error::ApkError;
use crate::fingerprint::FingerprintRecord;
use crate::lineage::{self, LineageEntry, LineageReader};
use crate::verifier::{self, SigningVerifier};

/// Signing identity aggregate of one package.
///
/// Invariants enforced on construction:
/// - fingerprint ranges are disjoint, sorted ascending and minimal; gaps
///   mean "unsigned for that range"
/// - an all-null reconciliation collapses to an empty fingerprint list
/// - the lineage is either empty or holds at least two entries, since a
///   rotation history with a single state is meaningless
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSignature {
    fingerprints: Vec<FingerprintRecord>,
    lineage: Vec<LineageEntry>,
}

impl AppSignature {
    pub fn new(
        fingerprints: Vec<FingerprintRecord>,
        lineage: Vec<LineageEntry>,
    ) -> Result<Self, ApkError> {
        if lineage.len() == 1 {
            return Err(ApkError::InvalidLineage(
                "a single-entry lineage cannot describe a rotation".into(),
            ));
        }

        Ok(Self {
            fingerprints: verifier::reconcile(fingerprints),
            lineage,
        })
    }

    /// Analyze the package at `path` with the platform `apksigner` tool.
    /// `declared_min_sdk` is the package manifest's minSdkVersion.
    pub fn parse(path: &Path, declared_min_sdk: i32) -> Result<Self, ApkError> {
        let tool = ApkSigner::new();
        Self::parse_with(&tool, &tool, path, declared_min_sdk)
    }

    /// Analyze with explicit collaborators. The two queries are independent
    /// and stateless; nothing depends on their relative order.
    pub fn parse_with(
        signing_verifier: &dyn SigningVerifier,
        lineage_reader: &dyn LineageReader,
        path: &Path,
        declared_min_sdk: i32,
    ) -> Result<Self, ApkError> {
        let lineage = lineage::read(lineage_reader, path)?;
        let records = verifier::probe(signing_verifier, path, declared_min_sdk)?;
        Self::new(records, lineage)
    }

    pub fn fingerprints(&self) -> &[FingerprintRecord] {
        &self.fingerprints
    }

    /// Rotation history, oldest to newest. Empty for never-rotated or
    /// unsigned packages.
    pub fn lineage(&self) -> &[LineageEntry] {
        &self.lineage
    }

    /// The certificate effective for a device running `sdk`, if any. The
    /// range list is small, so a linear scan over the first covering
    /// interval is all the lookup there is.
    pub fn get_signature(&self, sdk: i32) -> Option<&FingerprintRecord> {
        self.fingerprints.iter().find(|record| record.range.contains(sdk))
    }

    /// True when no certificate could be verified for any probed range.
    pub fn unsigned(&self) -> bool {
        self.fingerprints.is_empty()
    }

    /// True when the package carries a certificate-rotation history.
    pub fn rotated(&self) -> bool {
        !self.lineage.is_empty()
    }

    /// Digests this package's signing history trusts, newest first. For a
    /// never-rotated package this is the highest-SDK certificate alone.
    /// Lineage entries missing the requested digest kind are skipped.
    pub fn trusted_digest_history(&self, kind: DigestKind) -> Vec<&str> {
        if self.lineage.is_empty() {
            return self
                .fingerprints
                .last()
                .and_then(|record| record.fingerprint.digest(kind))
                .into_iter()
                .collect();
        }

        self.lineage
            .iter()
            .rev()
            .filter_map(|entry| entry.fingerprint.digest(kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{Fingerprint, SdkRange};
    use crate::DEFAULT_MAX_SDK;

    const CERT_X: &str = "901ee5b342ed8c0552196f9347c009e2864af44ac0e77ab7f4cca431d1692119";
    const CERT_Y: &str = "4e8929a7f74291caad2f4c23a547e238d4fd7407a4960af749cf9e38a860e8bc";

    fn record(min_sdk: i32, max_sdk: i32, sha256: Option<&str>) -> FingerprintRecord {
        FingerprintRecord {
            range: SdkRange::new(min_sdk, max_sdk),
            fingerprint: Fingerprint {
                sha256: sha256.map(|s| s.to_string()),
                ..Fingerprint::default()
            },
        }
    }

    fn entry(sha256: &str) -> LineageEntry {
        LineageEntry {
            fingerprint: Fingerprint {
                sha256: Some(sha256.to_string()),
                ..Fingerprint::default()
            },
            ..LineageEntry::default()
        }
    }

    #[test]
    fn single_entry_lineage_is_rejected() {
        let result = AppSignature::new(
            vec![record(24, DEFAULT_MAX_SDK, Some(CERT_X))],
            vec![entry(CERT_X)],
        );
        assert!(matches!(result, Err(ApkError::InvalidLineage(_))));
    }

    #[test]
    fn construction_reconciles_fingerprints() {
        let signature = AppSignature::new(
            vec![
                record(18, 23, Some(CERT_X)),
                record(24, DEFAULT_MAX_SDK, Some(CERT_X)),
            ],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(
            signature.fingerprints(),
            &[record(18, DEFAULT_MAX_SDK, Some(CERT_X))]
        );
    }

    #[test]
    fn all_null_fingerprints_mean_unsigned() {
        let signature = AppSignature::new(
            vec![record(9, 23, None), record(24, DEFAULT_MAX_SDK, None)],
            Vec::new(),
        )
        .unwrap();
        assert!(signature.unsigned());
        assert!(signature.get_signature(24).is_none());
    }

    #[test]
    fn get_signature_returns_the_covering_record() {
        let signature = AppSignature::new(
            vec![
                record(9, 23, Some(CERT_X)),
                record(24, DEFAULT_MAX_SDK, Some(CERT_Y)),
            ],
            Vec::new(),
        )
        .unwrap();

        assert_eq!(
            signature.get_signature(23).unwrap().fingerprint.sha256.as_deref(),
            Some(CERT_X)
        );
        assert_eq!(
            signature.get_signature(33).unwrap().fingerprint.sha256.as_deref(),
            Some(CERT_Y)
        );
        assert!(signature.get_signature(8).is_none());
    }

    #[test]
    fn gaps_between_records_stay_uncovered() {
        let signature = AppSignature::new(
            vec![
                record(9, 17, Some(CERT_X)),
                record(24, DEFAULT_MAX_SDK, Some(CERT_X)),
            ],
            Vec::new(),
        )
        .unwrap();
        assert!(signature.get_signature(20).is_none());
    }

    #[test]
    fn rotated_tracks_lineage_presence() {
        let plain =
            AppSignature::new(vec![record(24, DEFAULT_MAX_SDK, Some(CERT_X))], Vec::new())
                .unwrap();
        assert!(!plain.rotated());

        let rotated = AppSignature::new(
            vec![record(24, DEFAULT_MAX_SDK, Some(CERT_Y))],
            vec![entry(CERT_X), entry(CERT_Y)],
        )
        .unwrap();
        assert!(rotated.rotated());
    }

    #[test]
    fn trusted_history_is_newest_first() {
        let rotated = AppSignature::new(
            vec![record(24, DEFAULT_MAX_SDK, Some(CERT_Y))],
            vec![entry(CERT_X), entry(CERT_Y)],
        )
        .unwrap();
        assert_eq!(
            rotated.trusted_digest_history(DigestKind::Sha256),
            vec![CERT_Y, CERT_X]
        );

        let plain =
            AppSignature::new(vec![record(24, DEFAULT_MAX_SDK, Some(CERT_X))], Vec::new())
                .unwrap();
        assert_eq!(plain.trusted_digest_history(DigestKind::Sha256), vec![CERT_X]);
        assert!(plain.trusted_digest_history(DigestKind::Sha1).is_empty());
    }
}
