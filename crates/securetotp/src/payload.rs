// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `securetotp show` and `securetotp write`: read and replace the payload.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use securetotp_core::VaultError;

use crate::context::{report_success, VaultContext};

/// Decrypt the vault and copy the payload to stdout unchanged.
pub fn run_show(ctx: &VaultContext) -> Result<(), VaultError> {
    let vault = ctx.open()?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(vault.data())
        .and_then(|()| stdout.flush())
        .map_err(|e| VaultError::io("<stdout>", e))
}

/// Replace the payload with the contents of `input` and save.
pub fn run_write(ctx: &VaultContext, input: &Path) -> Result<(), VaultError> {
    let payload = fs::read(input).map_err(|e| VaultError::io(input, e))?;
    let mut vault = ctx.open()?;
    vault.write_to_file(ctx.path(), &payload)?;

    report_success(&format!(
        "wrote {} bytes to {}",
        payload.len(),
        ctx.path().display()
    ));
    Ok(())
}
