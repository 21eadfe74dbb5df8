/*
 * ApkTrust v0.1.0
 * Copyright (c) 2026 Tiash H Kabir / @MrCarb0n.
 * Licensed under the MIT License.
 */

use apktrust::cli;
use apktrust::ui::Ui;

fn main() {
    match cli::run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let mut ui = Ui::default();
            ui.enable_colors_if_supported();
            ui.error(&format!("{}", e));
            std::process::exit(2);
        }
    }
}
