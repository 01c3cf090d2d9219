// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format-version registry for key schemes.
//!
//! Each vault format version maps to exactly one key scheme. Adding a format
//! is a [`SchemeRegistry::register`] call; unknown versions are rejected,
//! never routed to a fallback.

use std::collections::BTreeMap;

use secrecy::ExposeSecret;
use securetotp_core::{
    CredentialProvider, KdfDispatch, KdfRecord, PassphrasePurpose, SecretKey, VaultError,
};
use tracing::{debug, warn};

use crate::kdf::{self, KdfParams};

/// Format version whose key comes from SHA3-512 stretching followed by Argon2id.
pub const FORMAT_VERSION_ARGON2ID: u32 = 2;

/// Format version written by new vaults.
pub const CURRENT_FORMAT_VERSION: u32 = FORMAT_VERSION_ARGON2ID;

/// Derives a key from credentials for one format version.
pub trait KeyScheme: Send + Sync {
    /// `record == None` means a fresh salt and default parameters.
    fn derive(
        &self,
        credentials: &dyn CredentialProvider,
        record: Option<&KdfRecord>,
    ) -> Result<(KdfRecord, SecretKey), VaultError>;
}

/// Key scheme for [`FORMAT_VERSION_ARGON2ID`].
#[derive(Debug, Clone, Default)]
pub struct Argon2idScheme {
    defaults: KdfParams,
}

impl Argon2idScheme {
    /// Fresh derivations record `defaults`; stored records keep their own costs.
    pub fn new(defaults: KdfParams) -> Self {
        Self { defaults }
    }
}

impl KeyScheme for Argon2idScheme {
    fn derive(
        &self,
        credentials: &dyn CredentialProvider,
        record: Option<&KdfRecord>,
    ) -> Result<(KdfRecord, SecretKey), VaultError> {
        let purpose = match record {
            None => PassphrasePurpose::Create,
            Some(_) => PassphrasePurpose::Unlock,
        };
        let passphrase = credentials.passphrase(purpose)?;
        let key_file = credentials.key_file();

        if purpose == PassphrasePurpose::Create
            && key_file.is_none()
            && passphrase.expose_secret().is_empty()
        {
            warn!("creating vault key from an empty passphrase without a key file");
        }

        let derived = kdf::derive_key(
            passphrase.expose_secret().as_bytes(),
            key_file,
            record,
            &self.defaults,
        )?;
        Ok((derived.record, derived.key))
    }
}

/// Table of `format_version → key scheme`, bound to one credential source.
pub struct SchemeRegistry {
    credentials: Box<dyn CredentialProvider>,
    schemes: BTreeMap<u32, Box<dyn KeyScheme>>,
}

impl SchemeRegistry {
    /// An empty registry. Every version is unknown until registered.
    pub fn new(credentials: Box<dyn CredentialProvider>) -> Self {
        Self {
            credentials,
            schemes: BTreeMap::new(),
        }
    }

    /// A registry with the built-in Argon2id scheme using the given costs for
    /// new vaults.
    pub fn with_defaults(credentials: Box<dyn CredentialProvider>, params: KdfParams) -> Self {
        let mut registry = Self::new(credentials);
        registry.register(FORMAT_VERSION_ARGON2ID, Box::new(Argon2idScheme::new(params)));
        registry
    }

    /// Register (or replace) the scheme for `format_version`.
    pub fn register(&mut self, format_version: u32, scheme: Box<dyn KeyScheme>) {
        self.schemes.insert(format_version, scheme);
    }

    pub fn supports(&self, format_version: u32) -> bool {
        self.schemes.contains_key(&format_version)
    }
}

impl KdfDispatch for SchemeRegistry {
    fn derive(
        &self,
        record: Option<&KdfRecord>,
        format_version: u32,
    ) -> Result<(KdfRecord, SecretKey), VaultError> {
        let scheme = self
            .schemes
            .get(&format_version)
            .ok_or(VaultError::UnknownFormatVersion(format_version))?;
        debug!(format_version, fresh = record.is_none(), "dispatching key derivation");
        scheme.derive(self.credentials.as_ref(), record)
    }
}
