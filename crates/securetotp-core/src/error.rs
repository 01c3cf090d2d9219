// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the SecureTOTP vault engine.

use std::path::PathBuf;

use strum::Display;
use thiserror::Error;

/// The primary error type returned by every vault operation.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The stored KDF identifier names a family this build cannot derive.
    #[error("unsupported KDF `{0}`")]
    UnsupportedKdf(String),

    /// The header's format version has no registered key scheme.
    #[error("unknown encrypted file version {0}")]
    UnknownFormatVersion(u32),

    /// The KDF cost parameter string is malformed or carries zero costs.
    #[error("malformed KDF parameters: {0}")]
    InvalidKdfParams(String),

    /// The file does not start with the vault magic.
    #[error("bad file magic")]
    BadMagic,

    /// The file is shorter than the fixed-size header.
    #[error("truncated vault header: expected {expected} bytes, found {actual}")]
    TruncatedHeader { expected: usize, actual: usize },

    /// The ciphertext region does not match the length recorded in the header.
    #[error("bad file length: header declares {expected} bytes, found {actual}")]
    BadLength { expected: u64, actual: u64 },

    /// The ciphertext checksum does not match the header.
    #[error("bad crc: header has {expected:#018x}, computed {actual:#018x}")]
    BadChecksum { expected: u64, actual: u64 },

    /// The ciphertext is too short to hold an IV and at least one block.
    #[error("insufficient ciphertext length")]
    InsufficientCiphertext,

    /// Padding check failed after decryption. Wrong credentials and corrupted
    /// data are reported identically.
    #[error("data corruption or incorrect credential")]
    DecryptionFailed,

    /// No key material is available to decrypt with.
    #[error("key is empty")]
    EmptyKey,

    /// A freshly written temp file did not load back; the original was left in place.
    #[error("verification of {} failed: {reason}", .path.display())]
    VerificationFailed { path: PathBuf, reason: String },

    /// Filesystem errors (missing file, permissions, disk full).
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Passphrase or key-file acquisition failed.
    #[error("credential error: {0}")]
    Credential(String),

    /// Internal or unexpected errors (programming errors, RNG failure).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Coarse classification of [`VaultError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ErrorKind {
    /// Unsupported KDF, unknown version, malformed parameters.
    Configuration,
    /// The file is not a valid, decryptable vault for the given credentials.
    Integrity,
    /// Filesystem failure.
    Io,
    /// Passphrase or key-file acquisition failure.
    Credential,
    /// Programming errors.
    Internal,
}

impl VaultError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedKdf(_) | Self::UnknownFormatVersion(_) | Self::InvalidKdfParams(_) => {
                ErrorKind::Configuration
            }
            Self::BadMagic
            | Self::TruncatedHeader { .. }
            | Self::BadLength { .. }
            | Self::BadChecksum { .. }
            | Self::InsufficientCiphertext
            | Self::DecryptionFailed
            | Self::EmptyKey
            | Self::VerificationFailed { .. } => ErrorKind::Integrity,
            Self::Io { .. } => ErrorKind::Io,
            Self::Credential(_) => ErrorKind::Credential,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}
