// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./securetotp.toml` > `~/.config/securetotp/securetotp.toml`
//! > `/etc/securetotp/securetotp.toml`, with environment variable overrides via
//! the `SECURETOTP_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::SecureTotpConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/securetotp/securetotp.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "securetotp.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/securetotp/securetotp.toml`
/// 3. `~/.config/securetotp/securetotp.toml`
/// 4. `./securetotp.toml`
/// 5. `explicit`, when a path was given on the command line
/// 6. `SECURETOTP_*` environment variables
pub fn load_config(explicit: Option<&Path>) -> Result<SecureTotpConfig, figment::Error> {
    build_figment(explicit).extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<SecureTotpConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecureTotpConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment(explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(SecureTotpConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));

    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment = figment.merge(Toml::file(LOCAL_CONFIG_FILE));

    if let Some(path) = explicit {
        figment = figment.merge(Toml::file(path));
    }

    figment.merge(env_provider())
}

/// Path of the per-user configuration file, if a config directory exists.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("securetotp").join(LOCAL_CONFIG_FILE))
}

/// Create the environment variable provider.
///
/// Only `SECURETOTP_VAULT_*` and `SECURETOTP_LOG_*` reach the config; other
/// variables under the prefix (such as `SECURETOTP_PASSPHRASE`) are not
/// configuration and must not trip `deny_unknown_fields`. The first
/// underscore after the section name becomes a dot, so
/// `SECURETOTP_VAULT_KDF_MEMORY_COST` maps to `vault.kdf_memory_cost`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SECURETOTP_")
        .filter(|key| {
            let key = key.as_str().to_ascii_lowercase();
            key.starts_with("vault_") || key.starts_with("log_")
        })
        .map(|key| {
            let key = key.as_str().to_ascii_lowercase();
            let mapped = if let Some(rest) = key.strip_prefix("vault_") {
                format!("vault.{rest}")
            } else if let Some(rest) = key.strip_prefix("log_") {
                format!("log.{rest}")
            } else {
                key
            };
            mapped.into()
        })
}
