// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential provider trait for passphrase and key-file sources.

use std::path::Path;

use secrecy::SecretString;

use crate::error::VaultError;
use crate::types::PassphrasePurpose;

/// Supplies the secrets folded into key derivation.
///
/// Passed explicitly to the key schemes instead of living in process-wide
/// state, so every derivation names exactly which credentials it used.
pub trait CredentialProvider: Send + Sync {
    /// Returns the passphrase for the given purpose. An empty passphrase is valid.
    fn passphrase(&self, purpose: PassphrasePurpose) -> Result<SecretString, VaultError>;

    /// Returns the key file whose bytes are mixed into the key, if any.
    fn key_file(&self) -> Option<&Path>;
}
