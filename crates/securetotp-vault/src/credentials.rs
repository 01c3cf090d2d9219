// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed in-memory credentials.

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use securetotp_core::{CredentialProvider, PassphrasePurpose, VaultError};

/// Credentials known up front: a passphrase and an optional key file.
///
/// Returns the same passphrase for every purpose. Used by tests and by
/// callers that gathered the secrets themselves.
pub struct StaticCredentials {
    passphrase: SecretString,
    key_file: Option<PathBuf>,
}

impl StaticCredentials {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: SecretString::from(passphrase.into()),
            key_file: None,
        }
    }

    /// Mix the bytes of `path` into every derivation.
    pub fn with_key_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.key_file = Some(path.into());
        self
    }
}

impl CredentialProvider for StaticCredentials {
    fn passphrase(&self, _purpose: PassphrasePurpose) -> Result<SecretString, VaultError> {
        Ok(SecretString::from(self.passphrase.expose_secret().to_owned()))
    }

    fn key_file(&self) -> Option<&Path> {
        self.key_file.as_deref()
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("passphrase", &"[REDACTED]")
            .field("key_file", &self.key_file)
            .finish()
    }
}
