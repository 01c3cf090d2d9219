// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the KDF, cipher, and persistence layers.

use strum::Display;
use zeroize::Zeroizing;

/// Length of the derived symmetric key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the Argon2id salt in bytes.
pub const SALT_LEN: usize = 32;

/// A derived 256-bit key, zeroed on drop.
pub type SecretKey = Zeroizing<[u8; KEY_LEN]>;

/// KDF families a vault may record in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum KdfFamily {
    Argon2id,
}

/// Persisted KDF parameters: everything needed to re-derive the key except
/// the credentials themselves.
///
/// `param_string` is stored verbatim so vaults stay decryptable after the
/// defaults change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdfRecord {
    pub salt: [u8; SALT_LEN],
    pub kdf_id: String,
    pub kdf_version: i32,
    pub param_string: String,
}

/// Why a passphrase is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassphrasePurpose {
    /// Unlocking an existing vault.
    Unlock,
    /// Creating a vault or setting a new passphrase; interactive sources confirm twice.
    Create,
}
