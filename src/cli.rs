/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use clap::{Arg, ArgAction, Command};

use crate::{
    config::{self, Config},
    digest::DigestKind,
    error::ApkError,
    fingerprint::FingerprintRecord,
    lineage::LineageEntry,
    signature::AppSignature,
    trust,
    ui::Ui,
    APP_ABOUT, APP_AUTHOR, APP_BIN_NAME, APP_NAME, APP_VERSION, DEFAULT_MAX_SDK,
};

/// Parse arguments and run. Returns the process exit code; a denied update
/// maps to exit code 1 without being an error.
pub fn run() -> Result<i32, ApkError> {
    let binary_name = std::env::args()
        .next()
        .and_then(|p| {
            std::path::Path::new(&p)
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| APP_BIN_NAME.to_string());

    let matches = build_command().bin_name(binary_name).get_matches();

    if matches.get_flag("version_custom") {
        let mut ui = Ui::default();
        ui.enable_colors_if_supported();
        ui.print_version_info();
        return Ok(0);
    }

    let verbosity_level = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");
    let mut ui = Ui::from_verbosity_level(verbosity_level, quiet, true);
    ui.enable_colors_if_supported();
    ui.print_banner();

    if matches.subcommand().is_none() {
        return Err(ApkError::Config("No command provided".into()));
    }

    run_logic(&matches, &ui)
}

/// The full clap command tree, shared by [`run`] and by tests that parse
/// argument vectors directly.
pub fn build_command() -> Command {
    Command::new(APP_NAME)
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .disable_version_flag(true)
        .help_template("{about-with-newline}{usage-heading} {usage}\n\n{all-args}\n")
        .subcommand_required(false)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("inspect")
                .about("Analyze an APK's signing certificates and rotation lineage")
                .arg_required_else_help(true)
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("Path to the APK to analyze (- for stdin)")
                        .index(1),
                )
                .arg(
                    Arg::new("min_sdk")
                        .short('m')
                        .long("min-sdk")
                        .help("Declared minSdkVersion of the APK (default 1)"),
                ),
        )
        .subcommand(
            Command::new("check-update")
                .about("Check whether a candidate APK may update an installed one")
                .arg_required_else_help(true)
                .arg(
                    Arg::new("installed")
                        .required(true)
                        .help("Path to the currently installed APK")
                        .index(1),
                )
                .arg(
                    Arg::new("candidate")
                        .required(true)
                        .help("Path to the candidate update APK")
                        .index(2),
                )
                .arg(
                    Arg::new("device_sdk")
                        .short('d')
                        .long("device-sdk")
                        .required(true)
                        .help("API level of the device performing the update"),
                )
                .arg(
                    Arg::new("min_sdk")
                        .short('m')
                        .long("min-sdk")
                        .help("Declared minSdkVersion of the APKs (default 1)"),
                ),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Set verbosity level (-v for verbose, -vv for more verbose, -vvv for debug)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress all output except errors"),
        )
        .arg(
            Arg::new("version_custom")
                .short('V')
                .long("version")
                .action(ArgAction::SetTrue)
                .help("Print version information"),
        )
}

fn run_logic(matches: &clap::ArgMatches, ui: &Ui) -> Result<i32, ApkError> {
    let config = Config::from_matches(matches, ui)?;

    match config.mode {
        config::Mode::Inspect => {
            ui.print_mode_header("INSPECTION MODE");
            ui.info(&format!("Analyzing: {}", config.input_path.display()));
            ui.verbose(&format!("Probing floor: API {}", config.min_sdk));

            let signature = AppSignature::parse(&config.input_path, config.min_sdk)?;
            print_signature(&signature);

            ui.print_summary(
                "Analysis Report",
                &[
                    ("File", config.input_path.display().to_string()),
                    ("Ranges", signature.fingerprints().len().to_string()),
                    ("Rotated", signature.rotated().to_string()),
                    ("Unsigned", signature.unsigned().to_string()),
                ],
            );
            Ok(0)
        }
        config::Mode::CheckUpdate { device_sdk } => {
            let candidate_path = config
                .candidate_path
                .as_ref()
                .ok_or_else(|| ApkError::Config("No candidate APK specified".into()))?;

            ui.print_mode_header("UPDATE CHECK MODE");
            ui.info(&format!("Installed: {}", config.input_path.display()));
            ui.info(&format!("Candidate: {}", candidate_path.display()));
            ui.verbose(&format!("Device API level: {}", device_sdk));

            let installed = AppSignature::parse(&config.input_path, config.min_sdk)?;
            let candidate = AppSignature::parse(candidate_path, config.min_sdk)?;

            let Some(installed_record) = installed.get_signature(device_sdk) else {
                return Err(ApkError::Config(format!(
                    "installed package has no verifiable certificate at API {}",
                    device_sdk
                )));
            };

            let decision = trust::get_target_certificate(
                &installed_record.fingerprint,
                installed.lineage(),
                &candidate,
                device_sdk,
            );

            match decision {
                Some(certificate) => {
                    ui.success("Update permitted.");
                    println!("allowed");
                    for kind in [DigestKind::Sha256, DigestKind::Sha1, DigestKind::Md5] {
                        if let Some(digest) = certificate.digest(kind) {
                            println!("{:<8} {}", kind.as_str(), digest);
                        }
                    }
                    Ok(0)
                }
                None => {
                    ui.warn("Update denied by platform trust rules.");
                    println!("denied");
                    Ok(1)
                }
            }
        }
    }
}

fn print_signature(signature: &AppSignature) {
    if signature.unsigned() {
        println!("unsigned");
        return;
    }

    for record in signature.fingerprints() {
        print_record(record);
    }

    if signature.rotated() {
        println!("lineage (oldest to newest):");
        for (index, entry) in signature.lineage().iter().enumerate() {
            print_lineage_entry(index, entry);
        }
    }
}

fn print_record(record: &FingerprintRecord) {
    if record.range.max_sdk == DEFAULT_MAX_SDK {
        println!("sdk {}+:", record.range.min_sdk);
    } else {
        println!("sdk {}..={}:", record.range.min_sdk, record.range.max_sdk);
    }
    for kind in [DigestKind::Md5, DigestKind::Sha1, DigestKind::Sha256] {
        if let Some(digest) = record.fingerprint.digest(kind) {
            println!("  {:<8} {}", kind.as_str(), digest);
        }
    }
}

fn print_lineage_entry(index: usize, entry: &LineageEntry) {
    println!("  signer #{}:", index + 1);
    for kind in [DigestKind::Md5, DigestKind::Sha1, DigestKind::Sha256] {
        if let Some(digest) = entry.fingerprint.digest(kind) {
            println!("    {:<8} {}", kind.as_str(), digest);
        }
    }
    let caps = &entry.capabilities;
    println!(
        "    capabilities: installed_data={} shared_uid={} permission={} rollback={} auth={}",
        caps.installed_data, caps.shared_uid, caps.permission, caps.rollback, caps.auth
    );
}
