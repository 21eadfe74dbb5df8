/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! # ApkTrust Library
//!
//! Determines which signing certificate of an Android APK is effective on a
//! given platform API level, and whether updating an installed package to a
//! new one is a trust-safe operation (direct match, rollback, key rotation).
//! All signing facts come from the platform `apksigner` tool; this library
//! reconciles its scheme- and SDK-range-dependent answers into one
//! consistent model.

pub mod apksigner;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod lineage;
pub mod signature;
pub mod trust;
pub mod ui;
pub mod verifier;

pub const APP_NAME: &str = "ApkTrust";
pub const APP_BIN_NAME: &str = "apktrust";
pub const APP_VERSION: &str = "0.1.0";
pub const APP_AUTHOR: &str = "Tiash H Kabir / @MrCarb0n";
pub const APP_ABOUT: &str = "Android APK signing-certificate analysis and update-trust evaluation, backed by the platform apksigner tool.";

/// SHA-256 with RSA is supported since API 18, although still a v1 scheme.
pub const V1_SHA256_RSA_SDK: i32 = 18;
/// First API level that supports the v2 signing scheme.
pub const V2_SCHEME_SDK: i32 = 24;
/// First API level that supports the v3 signing scheme (key rotation).
pub const V3_SCHEME_SDK: i32 = 28;
/// First API level that supports the v3.1 signing scheme.
pub const V3_1_SCHEME_SDK: i32 = 33;
/// Stands for "this and all future API levels".
pub const DEFAULT_MAX_SDK: i32 = i32::MAX;

/// apksigner only reliably reports presence of v2-or-later schemes when the
/// queried upper bound is at least 33, although by specification it should
/// be 30.
pub const V2_ACCURACY_SDK: i32 = 33;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;
