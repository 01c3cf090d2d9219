// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `securetotp init` command implementation.

use std::fs;
use std::io;
use std::path::Path;

use securetotp_core::VaultError;
use securetotp_vault::{Vault, CURRENT_FORMAT_VERSION};
use tracing::info;

use crate::context::{report_success, VaultContext};

/// Create a new vault at the resolved path.
///
/// Refuses to touch an existing file. The payload comes from `input`, or is
/// empty. Missing parent directories are created owner-only.
pub fn run_init(ctx: &VaultContext, input: Option<&Path>) -> Result<(), VaultError> {
    let path = ctx.path();
    if Vault::exists(path) {
        return Err(VaultError::io(
            path,
            io::Error::new(io::ErrorKind::AlreadyExists, "vault already exists"),
        ));
    }

    let payload = match input {
        Some(file) => fs::read(file).map_err(|e| VaultError::io(file, e))?,
        None => Vec::new(),
    };

    let mut vault = Vault::init(CURRENT_FORMAT_VERSION, &ctx.registry())?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_private_dir(parent)?;
    }
    vault.write_to_file(path, &payload)?;

    info!(path = %path.display(), "vault created");
    report_success(&format!("vault created at {}", path.display()));
    Ok(())
}

fn create_private_dir(dir: &Path) -> Result<(), VaultError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| VaultError::io(dir, e))
}
