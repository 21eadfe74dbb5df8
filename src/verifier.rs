/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Probes the signing verifier across the historical signing-scheme eras
//! and reconciles its partial, range-dependent answers into a minimal,
//! disjoint set of SDK ranges.

use std::path::Path;

use crate::error::ApkError;
use crate::fingerprint::{Fingerprint, FingerprintRecord, SdkRange};
use crate::{DEFAULT_MAX_SDK, V1_SHA256_RSA_SDK, V2_ACCURACY_SDK, V2_SCHEME_SDK, V3_SCHEME_SDK};

/// One signer block of verifier output, scoped to a band of API levels.
/// The verifier may subdivide a queried range when a rotation boundary
/// falls inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerHunk {
    pub range: SdkRange,
    pub lines: Vec<String>,
}

/// Reports the certificate(s) visible to devices in a bounded SDK range.
/// An empty result means "does not verify in this range", which is a valid
/// absence, not a failure.
pub trait SigningVerifier {
    fn print_certs(
        &self,
        path: &Path,
        min_sdk: i32,
        max_sdk: i32,
    ) -> Result<Vec<SignerHunk>, ApkError>;
}

/// The signing-scheme eras, keyed to the API levels where each scheme
/// generation became available. Each era must be queried separately because
/// the verifier answers as a device of that range would.
pub const SCHEME_ERAS: [(i32, i32); 4] = [
    (9, V1_SHA256_RSA_SDK - 1),
    // Only this range reports v1 fingerprints correctly including SHA-256 w/ RSA.
    (V1_SHA256_RSA_SDK, V2_SCHEME_SDK - 1),
    // Only this range reports v3-scheme fingerprints correctly for devices without v3 support.
    (V2_SCHEME_SDK, V3_SCHEME_SDK - 1),
    (V3_SCHEME_SDK, DEFAULT_MAX_SDK),
];

/// Query the verifier once per applicable era and collect raw, possibly
/// gapped certificate records above the package's declared minimum SDK.
///
/// The verifier only reliably reports presence of v2-or-later schemes when
/// the queried upper bound reaches [`V2_ACCURACY_SDK`]. For the first era
/// that would be affected, a single unbounded probe decides whether any
/// v2-or-later scheme exists at all; if not, the remaining eras are
/// abandoned because their answers cannot be trusted.
pub fn probe(
    verifier: &dyn SigningVerifier,
    path: &Path,
    min_sdk_floor: i32,
) -> Result<Vec<FingerprintRecord>, ApkError> {
    let mut records = Vec::new();
    let mut v2_presence_checked = false;

    for (era_min, era_max) in SCHEME_ERAS {
        if min_sdk_floor > era_max {
            continue;
        }

        let effective_min = era_min.max(min_sdk_floor);

        if !v2_presence_checked && effective_min >= V2_SCHEME_SDK && era_max < V2_ACCURACY_SDK {
            v2_presence_checked = true;

            let unbounded = verifier.print_certs(path, effective_min, DEFAULT_MAX_SDK)?;
            if unbounded.is_empty() {
                // No v2 or later scheme. Per-era answers from here on are
                // unusable because of the v3 scheme's detection flaw.
                break;
            }
        }

        for hunk in verifier.print_certs(path, effective_min, era_max)? {
            let mut fingerprint = Fingerprint::default();
            for line in &hunk.lines {
                fingerprint.apply_digest_line(line)?;
            }

            records.push(FingerprintRecord {
                range: SdkRange::new(hunk.range.min_sdk.max(min_sdk_floor), hunk.range.max_sdk),
                fingerprint,
            });
        }
    }

    Ok(records)
}

/// Collapse raw probe records into a sorted, disjoint, minimal range set.
/// Unsigned spans are dropped so that equal certificates merge across them;
/// adjacent or overlapping ranges with the same certificate become one
/// record. Equality is decided on the strongest digest kind both records
/// carry, so SHA-1-only records from legacy tooling never merge with a
/// different certificate just because neither side has a SHA-256.
pub fn reconcile(mut records: Vec<FingerprintRecord>) -> Vec<FingerprintRecord> {
    records.sort_by_key(|record| record.range.min_sdk);

    let mut merged: Vec<FingerprintRecord> = Vec::new();
    for record in records {
        // An unsigned span carries no information and must not block merging.
        if record.fingerprint.is_absent() {
            continue;
        }

        if let Some(last) = merged.last_mut() {
            if last.fingerprint.matches(&record.fingerprint)
                && record.range.min_sdk <= last.range.max_sdk.saturating_add(1)
            {
                last.range.max_sdk = record.range.max_sdk;
                continue;
            }
        }

        merged.push(record);
    }

    if merged.len() == 1 && merged[0].fingerprint.is_absent() {
        return Vec::new();
    }

    merged
}
