/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Platform certificate-rotation trust policy: decides whether installing a
//! candidate package over an already-installed one is permitted, as
//! perceived by a device running a specific API level.

use crate::fingerprint::Fingerprint;
use crate::lineage::LineageEntry;
use crate::signature::AppSignature;
use crate::V3_SCHEME_SDK;

/// Evaluate an update from the installed certificate (and its recorded
/// lineage) to `candidate`, for a device running `device_sdk`.
///
/// Checks run in fixed precedence order:
/// 1. the candidate must carry a certificate covering `device_sdk` at all
/// 2. direct match with the installed certificate
/// 3. rollback to a historical signer of the installed package, permitted
///    only when that lineage entry carries the rollback capability; valid
///    at any device level since it concerns the installed package's own
///    recorded history
/// 4. forward key rotation, only on devices that understand lineage
///    semantics (v3-capable): the candidate's lineage must acknowledge the
///    installed identity, current certificate or any of its recorded
///    ancestors, as a legitimate predecessor
///
/// Returns the certificate that becomes effective, or `None` when the
/// update must be denied. Denial is a normal outcome, not an error.
pub fn get_target_certificate(
    installed_certificate: &Fingerprint,
    installed_lineage: &[LineageEntry],
    candidate: &AppSignature,
    device_sdk: i32,
) -> Option<Fingerprint> {
    let target = candidate.get_signature(device_sdk)?.fingerprint.clone();

    if target.matches(installed_certificate) {
        return Some(target);
    }

    let rollback_permitted = installed_lineage
        .iter()
        .any(|entry| entry.capabilities.rollback && entry.fingerprint.matches(&target));
    if rollback_permitted {
        return Some(target);
    }

    if device_sdk >= V3_SCHEME_SDK {
        let acknowledged = candidate.lineage().iter().any(|entry| {
            entry.fingerprint.matches(installed_certificate)
                || installed_lineage
                    .iter()
                    .any(|past| entry.fingerprint.matches(&past.fingerprint))
        });
        if acknowledged {
            return Some(target);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::{FingerprintRecord, SdkRange};
    use crate::lineage::Capabilities;
    use crate::DEFAULT_MAX_SDK;

    const CERT_A: &str = "901ee5b342ed8c0552196f9347c009e2864af44ac0e77ab7f4cca431d1692119";
    const CERT_B: &str = "c0552196f9347c009e2864af44ac0e77ab901ee5b342ed87f4cca431d1692119";
    const CERT_C: &str = "4cca431d169211901ee5b342ed8c0552196f9347c009e2864af44ac0e77ab7f9";

    fn cert(sha256: &str) -> Fingerprint {
        Fingerprint {
            sha256: Some(sha256.to_string()),
            ..Fingerprint::default()
        }
    }

    fn entry(sha256: &str, rollback: bool) -> LineageEntry {
        LineageEntry {
            fingerprint: cert(sha256),
            capabilities: Capabilities {
                installed_data: true,
                shared_uid: true,
                permission: true,
                rollback,
                auth: true,
            },
        }
    }

    fn record(min_sdk: i32, max_sdk: i32, sha256: &str) -> FingerprintRecord {
        FingerprintRecord {
            range: SdkRange::new(min_sdk, max_sdk),
            fingerprint: cert(sha256),
        }
    }

    fn signature(records: Vec<FingerprintRecord>, lineage: Vec<LineageEntry>) -> AppSignature {
        AppSignature::new(records, lineage).unwrap()
    }

    #[test]
    fn unsigned_candidate_is_always_denied() {
        let candidate = signature(Vec::new(), Vec::new());
        for sdk in [24, 27, 33] {
            assert!(get_target_certificate(&cert(CERT_A), &[], &candidate, sdk).is_none());
        }
    }

    #[test]
    fn direct_match_is_allowed_at_any_level() {
        let candidate = signature(vec![record(24, DEFAULT_MAX_SDK, CERT_A)], Vec::new());
        for sdk in [24, 27, 33] {
            assert_eq!(
                get_target_certificate(&cert(CERT_A), &[], &candidate, sdk),
                Some(cert(CERT_A))
            );
        }
    }

    #[test]
    fn differing_certificate_without_history_is_denied() {
        let candidate = signature(vec![record(24, DEFAULT_MAX_SDK, CERT_B)], Vec::new());
        assert!(get_target_certificate(&cert(CERT_A), &[], &candidate, 33).is_none());
    }

    #[test]
    fn rollback_is_allowed_below_v3_when_capability_is_granted() {
        let installed_lineage = vec![entry(CERT_A, true), entry(CERT_C, false)];
        let candidate = signature(vec![record(24, DEFAULT_MAX_SDK, CERT_A)], Vec::new());

        assert_eq!(
            get_target_certificate(&cert(CERT_C), &installed_lineage, &candidate, 27),
            Some(cert(CERT_A))
        );
    }

    #[test]
    fn rollback_is_denied_without_the_capability() {
        let installed_lineage = vec![entry(CERT_A, false), entry(CERT_C, false)];
        let candidate = signature(vec![record(24, DEFAULT_MAX_SDK, CERT_A)], Vec::new());

        assert!(
            get_target_certificate(&cert(CERT_C), &installed_lineage, &candidate, 27).is_none()
        );
    }

    #[test]
    fn forward_rotation_is_gated_on_device_level() {
        let installed_lineage = vec![entry(CERT_A, false), entry(CERT_C, false)];
        let candidate = signature(
            vec![record(24, 32, CERT_A), record(33, DEFAULT_MAX_SDK, CERT_B)],
            vec![entry(CERT_A, false), entry(CERT_B, false)],
        );

        // The device below v3 does not understand lineage proofs.
        assert!(
            get_target_certificate(&cert(CERT_C), &installed_lineage, &candidate, 27).is_none()
        );
        // A v3-capable device accepts the rotation acknowledged via cert A.
        assert_eq!(
            get_target_certificate(&cert(CERT_C), &installed_lineage, &candidate, 33),
            Some(cert(CERT_B))
        );
    }

    #[test]
    fn rotation_whose_newest_signer_is_the_installed_one_is_a_direct_update() {
        let candidate = signature(
            vec![record(24, 32, CERT_B), record(33, DEFAULT_MAX_SDK, CERT_A)],
            vec![entry(CERT_B, false), entry(CERT_A, false)],
        );

        assert_eq!(
            get_target_certificate(&cert(CERT_A), &[], &candidate, 33),
            Some(cert(CERT_A))
        );
        // Below v3 the effective candidate certificate is B, which nothing trusts.
        assert!(get_target_certificate(&cert(CERT_A), &[], &candidate, 27).is_none());
    }

    #[test]
    fn forward_rotation_accepts_the_installed_certificate_as_ancestor() {
        // Installed is plain cert A; candidate rotated a -> b.
        let candidate = signature(
            vec![record(24, 32, CERT_A), record(33, DEFAULT_MAX_SDK, CERT_B)],
            vec![entry(CERT_A, false), entry(CERT_B, false)],
        );

        assert_eq!(
            get_target_certificate(&cert(CERT_A), &[], &candidate, 33),
            Some(cert(CERT_B))
        );
        // At 27 the effective candidate certificate is still A: direct update.
        assert_eq!(
            get_target_certificate(&cert(CERT_A), &[], &candidate, 27),
            Some(cert(CERT_A))
        );
    }

    #[test]
    fn comparisons_fall_back_to_sha1_only_tooling() {
        let sha1_installed = Fingerprint {
            sha1: Some("4ad4e4376face4e441a3b8802363a7f6c6b458ab".into()),
            ..Fingerprint::default()
        };
        let full = Fingerprint {
            sha1: Some("4ad4e4376face4e441a3b8802363a7f6c6b458ab".into()),
            sha256: Some(CERT_A.into()),
            ..Fingerprint::default()
        };
        let candidate = signature(
            vec![FingerprintRecord {
                range: SdkRange::new(24, DEFAULT_MAX_SDK),
                fingerprint: full.clone(),
            }],
            Vec::new(),
        );

        assert_eq!(
            get_target_certificate(&sha1_installed, &[], &candidate, 30),
            Some(full)
        );
    }
}
