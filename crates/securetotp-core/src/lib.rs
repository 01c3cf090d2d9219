// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SecureTOTP vault.
//!
//! This crate provides the error taxonomy, the seam traits between the
//! persistence engine and its collaborators, and the small value types
//! shared across the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{ErrorKind, VaultError};
pub use traits::{CredentialProvider, KdfDispatch};
pub use types::{KdfFamily, KdfRecord, PassphrasePurpose, SecretKey, KEY_LEN, SALT_LEN};
