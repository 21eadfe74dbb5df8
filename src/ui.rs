/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

//! Terminal output layer: verbosity-gated, icon-prefixed diagnostics on
//! stderr. Analysis results themselves go to stdout in the CLI.

use colored::*;

use crate::{APP_AUTHOR, APP_NAME, APP_VERSION};

pub struct Ui {
    pub verbose: bool,
    pub very_verbose: bool,
    pub debug: bool,
    silent: bool,
    colors: bool,
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(false, false, false, false, true)
    }
}

impl Ui {
    pub fn new(v: bool, vv: bool, d: bool, s: bool, c: bool) -> Self {
        Self {
            verbose: v,
            very_verbose: vv,
            debug: d,
            silent: s,
            colors: c,
        }
    }

    pub fn from_verbosity_level(level: u8, s: bool, c: bool) -> Self {
        Self::new(level >= 1, level >= 2, level >= 3, s, c)
    }

    pub fn enable_colors_if_supported(&mut self) {
        #[cfg(windows)]
        if self.colors {
            colored::control::set_override(true);
        }
    }

    fn supports_color(&self) -> bool {
        self.colors && std::env::var("NO_COLOR").is_err()
    }

    fn paint(&self, icon: &str, msg: &str, color: &str, is_error: bool, is_dim: bool) {
        if self.silent && !is_error {
            return;
        }
        if self.supports_color() {
            let ic = match color {
                "31" => icon.red().bold(),
                "32" => icon.green().bold(),
                "33" => icon.yellow().bold(),
                "34" => icon.blue().bold(),
                _ => icon.bold(),
            };
            if is_dim {
                eprintln!("{} {}", ic.dimmed(), msg.dimmed());
            } else {
                eprintln!("{} {}", ic, msg);
            }
        } else {
            eprintln!("{} {}", icon, msg);
        }
    }

    pub fn print_banner(&self) {
        if self.silent || !self.verbose {
            return;
        }
        let title = format!(" {} v{} ", APP_NAME, APP_VERSION);
        // Narrow terminals get the bare title without the box.
        if self.term_width() < title.len() + 4 {
            if self.supports_color() {
                eprintln!("{}", title.cyan().bold());
            } else {
                eprintln!("{}", title);
            }
            return;
        }
        let border = "-".repeat(title.len());
        if self.supports_color() {
            eprintln!(
                "{}\n{}\n{}",
                format!("+-{}-+", border).magenta().bold(),
                format!("| {} |", title.cyan().bold()),
                format!("+-{}-+", border).magenta().bold()
            );
        } else {
            eprintln!("+-{}-+\n| {} |\n+-{}-+", border, title, border);
        }
    }

    pub fn print_version_info(&self) {
        println!("{} v{}", APP_NAME, APP_VERSION);
        println!("Author:      {}", APP_AUTHOR);
        println!("Repository:  https://github.com/MrCarb0n/apktrust");
        println!("License:     MIT");
        println!("Description: Android APK signing-certificate analysis and update-trust evaluation.");
    }

    pub fn print_mode_header(&self, title: &str) {
        if self.silent || !self.verbose {
            return;
        }
        let header = format!("-- {} --", title);
        if self.supports_color() {
            eprintln!("\n{}", header.yellow().bold());
        } else {
            eprintln!("\n{}", header);
        }
    }

    pub fn print_summary(&self, title: &str, fields: &[(&str, String)]) {
        if self.silent || !self.verbose {
            return;
        }
        if self.supports_color() {
            eprintln!("{}", format!("{}:", title).green().bold());
            for (key, val) in fields {
                eprintln!("  {:<12} {}", key.cyan().bold(), val.green());
            }
        } else {
            eprintln!("{}:", title);
            for (key, val) in fields {
                eprintln!("  {:<12} {}", key, val);
            }
        }
    }

    pub fn info(&self, msg: &str) {
        if self.verbose {
            self.paint("[i]", msg, "34", false, false);
        }
    }
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            self.paint("[v]", msg, "2", false, true);
        }
    }
    pub fn very_verbose(&self, msg: &str) {
        if self.very_verbose {
            self.paint("[vv]", msg, "2", false, true);
        }
    }
    pub fn debug(&self, msg: &str) {
        if self.debug {
            self.paint("[dbg]", msg, "2", false, true);
        }
    }
    pub fn success(&self, msg: &str) {
        if !self.silent {
            self.paint("[+]", msg, "32", false, false);
        }
    }
    pub fn warn(&self, msg: &str) {
        if !self.silent {
            self.paint("[!]", msg, "33", true, false);
        }
    }
    pub fn error(&self, msg: &str) {
        self.paint("[x]", msg, "31", true, false);
    }

    /// Terminal width, preferring an explicit `COLUMNS` override so piped
    /// and CI runs behave deterministically.
    fn term_width(&self) -> usize {
        std::env::var("COLUMNS")
            .ok()
            .and_then(|s| s.parse().ok())
            .or_else(|| terminal_size::terminal_size().map(|(w, _)| w.0 as usize))
            .unwrap_or(80)
    }
}
