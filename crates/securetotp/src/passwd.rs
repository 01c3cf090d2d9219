// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `securetotp passwd` command implementation.
//!
//! Unlocks with the current credentials, derives a new key under a fresh
//! salt from the new credentials, and saves. The new passphrase comes from
//! `SECURETOTP_NEW_PASSPHRASE` or a confirmed prompt.

use std::path::PathBuf;

use securetotp_core::VaultError;
use securetotp_vault::prompt::NEW_PASSPHRASE_ENV_VAR;
use securetotp_vault::{PromptCredentials, CURRENT_FORMAT_VERSION};
use tracing::info;

use crate::context::{report_success, VaultContext};

/// Run the `securetotp passwd` command.
pub fn run_passwd(ctx: &VaultContext, new_key_file: Option<PathBuf>) -> Result<(), VaultError> {
    let mut vault = ctx.open()?;

    let new_credentials = PromptCredentials::new(new_key_file).with_env_var(NEW_PASSPHRASE_ENV_VAR);
    vault.rekey(CURRENT_FORMAT_VERSION, &ctx.registry_for(new_credentials))?;
    vault.save(ctx.path())?;

    info!(path = %ctx.path().display(), "vault credentials changed");
    report_success("passphrase changed");
    Ok(())
}
