// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Format-version dispatch for key derivation.

use crate::error::VaultError;
use crate::types::{KdfRecord, SecretKey};

/// Maps a vault format version to the key scheme that version uses.
///
/// With `record == None` a fresh salt and default parameters are generated
/// (new vault or passphrase change). With a stored record, the key is
/// re-derived from the record's salt and parameters.
pub trait KdfDispatch {
    fn derive(
        &self,
        record: Option<&KdfRecord>,
        format_version: u32,
    ) -> Result<(KdfRecord, SecretKey), VaultError>;
}

impl<F> KdfDispatch for F
where
    F: Fn(Option<&KdfRecord>, u32) -> Result<(KdfRecord, SecretKey), VaultError>,
{
    fn derive(
        &self,
        record: Option<&KdfRecord>,
        format_version: u32,
    ) -> Result<(KdfRecord, SecretKey), VaultError> {
        self(record, format_version)
    }
}
