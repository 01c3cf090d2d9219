// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted single-file vault engine for SecureTOTP.
//!
//! A vault file is a fixed 156-byte header followed by
//! `IV || AES-256-CBC(PKCS#7(payload))`. The key is derived by hashing the
//! optional key file and the passphrase with SHA3-512 and stretching the
//! result with Argon2id under the salt and costs recorded in the header.
//! Writes go through a temp file that is verified before it replaces the
//! original.

pub mod checksum;
pub mod credentials;
pub mod crypto;
pub mod format;
pub mod kdf;
pub mod prompt;
pub mod scheme;
pub mod vault;

pub use credentials::StaticCredentials;
pub use format::{VaultHeader, FILE_MAGIC, HEADER_LEN};
pub use kdf::KdfParams;
pub use prompt::PromptCredentials;
pub use scheme::{
    Argon2idScheme, KeyScheme, SchemeRegistry, CURRENT_FORMAT_VERSION, FORMAT_VERSION_ARGON2ID,
};
pub use vault::{FileInfo, Vault};
