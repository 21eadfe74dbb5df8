/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Configuration parsing and validation for the ApkTrust CLI.

use std::io;
use std::path::PathBuf;

use clap::ArgMatches;
use tempfile::NamedTempFile;

use crate::error::ApkError;
use crate::ui::Ui;

/// Execution mode for the application.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Analyze one package and print its fingerprints and lineage
    Inspect,
    /// Evaluate whether a candidate may update an installed package
    CheckUpdate { device_sdk: i32 },
}

/// Application configuration parsed from command-line arguments. Output
/// verbosity is the [`Ui`]'s concern, not part of this struct.
#[derive(Debug)]
pub struct Config {
    /// Package to analyze (inspect) or the installed package (check-update)
    pub input_path: PathBuf,
    /// Candidate update package (check-update only)
    pub candidate_path: Option<PathBuf>,
    /// Execution mode
    pub mode: Mode,
    /// The manifest-declared minSdkVersion used as the probing floor
    pub min_sdk: i32,
    /// Temporary file keeping stdin input alive
    pub _input_temp_file: Option<NamedTempFile>,
}

impl Config {
    /// Parse configuration from command-line argument matches.
    pub fn from_matches(matches: &ArgMatches, ui: &Ui) -> Result<Self, ApkError> {
        match matches.subcommand() {
            Some(("inspect", sub_matches)) => Self::parse_inspect(sub_matches, ui),
            Some(("check-update", sub_matches)) => Self::parse_check_update(sub_matches, ui),
            _ => Err(ApkError::Config(
                "No subcommand provided. Use 'inspect' or 'check-update'.".into(),
            )),
        }
    }

    fn parse_inspect(matches: &ArgMatches, ui: &Ui) -> Result<Self, ApkError> {
        let input_str = matches
            .get_one::<String>("input")
            .ok_or_else(|| ApkError::Config("No input APK specified".into()))?;

        let (input_path, input_temp_file) = Self::resolve_input(input_str, ui)?;
        let min_sdk = Self::parse_min_sdk(matches)?;

        Ok(Self {
            input_path,
            candidate_path: None,
            mode: Mode::Inspect,
            min_sdk,
            _input_temp_file: input_temp_file,
        })
    }

    fn parse_check_update(matches: &ArgMatches, ui: &Ui) -> Result<Self, ApkError> {
        let installed_str = matches
            .get_one::<String>("installed")
            .ok_or_else(|| ApkError::Config("No installed APK specified".into()))?;
        let candidate_str = matches
            .get_one::<String>("candidate")
            .ok_or_else(|| ApkError::Config("No candidate APK specified".into()))?;

        let input_path = Self::existing_path(installed_str, ui)?;
        let candidate_path = Self::existing_path(candidate_str, ui)?;

        let device_sdk = matches
            .get_one::<String>("device_sdk")
            .ok_or_else(|| ApkError::Config("--device-sdk is required".into()))?
            .parse::<i32>()
            .map_err(|_| ApkError::Config("--device-sdk must be an integer".into()))?;
        if device_sdk < 1 {
            return Err(ApkError::Config("--device-sdk must be at least 1".into()));
        }

        let min_sdk = Self::parse_min_sdk(matches)?;

        Ok(Self {
            input_path,
            candidate_path: Some(candidate_path),
            mode: Mode::CheckUpdate { device_sdk },
            min_sdk,
            _input_temp_file: None,
        })
    }

    fn parse_min_sdk(matches: &ArgMatches) -> Result<i32, ApkError> {
        let min_sdk = match matches.get_one::<String>("min_sdk") {
            Some(raw) => raw
                .parse::<i32>()
                .map_err(|_| ApkError::Config("--min-sdk must be an integer".into()))?,
            None => 1,
        };
        if min_sdk < 1 {
            return Err(ApkError::Config("--min-sdk must be at least 1".into()));
        }
        Ok(min_sdk)
    }

    /// `-` reads the APK from stdin into a temp file; apksigner needs a
    /// real path.
    fn resolve_input(
        input_str: &str,
        ui: &Ui,
    ) -> Result<(PathBuf, Option<NamedTempFile>), ApkError> {
        if input_str == "-" {
            let mut temp = NamedTempFile::new().map_err(|e| {
                ApkError::Config(format!("Failed to create temp file for stdin: {}", e))
            })?;
            let mut stdin = io::stdin();
            io::copy(&mut stdin, &mut temp)
                .map_err(|e| ApkError::Config(format!("Failed to read stdin: {}", e)))?;
            ui.debug(&format!("Copied stdin to temporary file: {:?}", temp.path()));
            Ok((temp.path().to_path_buf(), Some(temp)))
        } else {
            Ok((Self::existing_path(input_str, ui)?, None))
        }
    }

    fn existing_path(raw: &str, ui: &Ui) -> Result<PathBuf, ApkError> {
        let path = PathBuf::from(raw);
        if !path.exists() {
            return Err(ApkError::Config(format!(
                "Input file does not exist: {}",
                path.display()
            )));
        }
        std::fs::metadata(&path).map_err(|e| {
            ApkError::Config(format!("Cannot access input file {}: {}", path.display(), e))
        })?;
        ui.debug(&format!("Using input file: {}", path.display()));
        Ok(path)
    }
}
