// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between the persistence engine and its collaborators.

pub mod credentials;
pub mod dispatch;

pub use credentials::CredentialProvider;
pub use dispatch::KdfDispatch;
