// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resolved vault location and credential wiring shared by every command.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use securetotp_config::model::DEFAULT_VAULT_FILE;
use securetotp_config::SecureTotpConfig;
use securetotp_core::VaultError;
use securetotp_vault::{KdfParams, PromptCredentials, SchemeRegistry, Vault};

/// Where the vault lives and how to derive its key.
#[derive(Debug)]
pub struct VaultContext {
    path: PathBuf,
    key_file: Option<PathBuf>,
    params: KdfParams,
}

impl VaultContext {
    /// `--file` wins over `vault.path`, which wins over the home-directory default.
    pub fn resolve(
        file: Option<PathBuf>,
        key_file: Option<PathBuf>,
        config: &SecureTotpConfig,
    ) -> Result<Self, VaultError> {
        let path = file.or_else(|| config.vault.resolved_path()).ok_or_else(|| {
            VaultError::io(
                Path::new("~").join(DEFAULT_VAULT_FILE),
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "home directory unknown; pass --file to locate the vault",
                ),
            )
        })?;

        Ok(Self {
            path,
            key_file,
            params: KdfParams {
                memory_cost: config.vault.kdf_memory_cost,
                iterations: config.vault.kdf_iterations,
                parallelism: config.vault.kdf_parallelism,
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Registry bound to the current credentials.
    pub fn registry(&self) -> SchemeRegistry {
        self.registry_for(PromptCredentials::new(self.key_file.clone()))
    }

    /// Registry bound to arbitrary prompt credentials, with this context's
    /// cost parameters for fresh derivations.
    pub fn registry_for(&self, credentials: PromptCredentials) -> SchemeRegistry {
        SchemeRegistry::with_defaults(Box::new(credentials), self.params)
    }

    /// Load and decrypt the vault with the current credentials.
    pub fn open(&self) -> Result<Vault, VaultError> {
        Vault::load_from_file(&self.path, &self.registry())
    }
}

/// Print a one-line confirmation to stderr, colored when stderr is a TTY.
pub fn report_success(message: &str) {
    if std::io::stderr().is_terminal() {
        use colored::Colorize;
        eprintln!("{} {message}", "✓".green());
    } else {
        eprintln!("[OK] {message}");
    }
}
