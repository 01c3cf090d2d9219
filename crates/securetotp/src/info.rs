// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `securetotp info` command implementation.
//!
//! Unlocks the vault and prints its header. With `--json` the output is a
//! single JSON object for scripting.

use std::io::IsTerminal;
use std::path::Path;

use securetotp_core::VaultError;
use securetotp_vault::FileInfo;

use crate::context::VaultContext;

/// Run the `securetotp info` command.
pub fn run_info(ctx: &VaultContext, json: bool) -> Result<(), VaultError> {
    let vault = ctx.open()?;
    let info = vault.file_info();

    if json {
        let rendered = serde_json::to_string_pretty(&info)
            .map_err(|e| VaultError::Internal(format!("failed to serialize file info: {e}")))?;
        println!("{rendered}");
    } else {
        let use_color = std::io::stdout().is_terminal();
        print_info(ctx.path(), &info, use_color);
    }
    Ok(())
}

fn print_info(path: &Path, info: &FileInfo, use_color: bool) {
    println!();
    if use_color {
        use colored::Colorize;
        println!("  {}", path.display().to_string().bold());
    } else {
        println!("  {}", path.display());
    }
    println!("  {}", "-".repeat(35));
    for line in info.to_string().lines() {
        println!("    {line}");
    }
    println!();
}
