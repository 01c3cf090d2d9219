// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or SECURETOTP_PASSPHRASE environment variable.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use securetotp_core::{CredentialProvider, PassphrasePurpose, VaultError};

/// The environment variable name for providing the vault passphrase.
pub const PASSPHRASE_ENV_VAR: &str = "SECURETOTP_PASSPHRASE";

/// The environment variable consulted for the replacement passphrase when
/// changing credentials.
pub const NEW_PASSPHRASE_ENV_VAR: &str = "SECURETOTP_NEW_PASSPHRASE";

/// Interactive credentials for the command-line front end.
///
/// Priority:
/// 1. The environment variable (`SECURETOTP_PASSPHRASE` unless overridden)
/// 2. Interactive TTY prompt via `rpassword`
///
/// An empty passphrase is accepted from either source.
#[derive(Debug)]
pub struct PromptCredentials {
    key_file: Option<PathBuf>,
    env_var: &'static str,
}

impl Default for PromptCredentials {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PromptCredentials {
    pub fn new(key_file: Option<PathBuf>) -> Self {
        Self {
            key_file,
            env_var: PASSPHRASE_ENV_VAR,
        }
    }

    /// Read the passphrase from `env_var` instead of `SECURETOTP_PASSPHRASE`.
    pub fn with_env_var(mut self, env_var: &'static str) -> Self {
        self.env_var = env_var;
        self
    }
}

impl CredentialProvider for PromptCredentials {
    fn passphrase(&self, purpose: PassphrasePurpose) -> Result<SecretString, VaultError> {
        // Env var does not need confirmation.
        if let Ok(pass) = std::env::var(self.env_var) {
            return Ok(SecretString::from(pass));
        }

        if !std::io::stdin().is_terminal() {
            return Err(VaultError::Credential(format!(
                "no passphrase provided; set {} or run interactively",
                self.env_var
            )));
        }

        match purpose {
            PassphrasePurpose::Unlock => read_password("Vault passphrase: ").map(SecretString::from),
            PassphrasePurpose::Create => {
                let first = read_password("New vault passphrase: ")?;
                let second = read_password("Confirm vault passphrase: ")?;
                if first != second {
                    return Err(VaultError::Credential("passphrases do not match".to_string()));
                }
                Ok(SecretString::from(first))
            }
        }
    }

    fn key_file(&self) -> Option<&Path> {
        self.key_file.as_deref()
    }
}

fn read_password(prompt: &str) -> Result<String, VaultError> {
    rpassword::prompt_password(prompt)
        .map_err(|e| VaultError::Credential(format!("failed to read passphrase: {e}")))
}
