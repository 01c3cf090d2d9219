// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates constraints that cannot be expressed via serde attributes,
//! such as Argon2id cost floors and known log levels.

use crate::diagnostic::ConfigError;
use crate::model::SecureTotpConfig;

/// Lowest memory cost accepted for new vaults, in KiB.
pub const MIN_KDF_MEMORY_COST: u32 = 8192;

/// Highest memory cost accepted, in KiB (4 GiB).
pub const MAX_KDF_MEMORY_COST: u32 = 4 * 1024 * 1024;

/// Highest pass count accepted.
pub const MAX_KDF_ITERATIONS: u32 = 1024;

/// Lane count is persisted in a single byte.
pub const MAX_KDF_PARALLELISM: u32 = 255;

/// Log levels understood by the tracing filter.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &SecureTotpConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let vault = &config.vault;

    if vault.kdf_memory_cost < MIN_KDF_MEMORY_COST {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be at least {MIN_KDF_MEMORY_COST} (8 MiB), got {}",
                vault.kdf_memory_cost
            ),
        });
    } else if vault.kdf_memory_cost > MAX_KDF_MEMORY_COST {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost must be at most {MAX_KDF_MEMORY_COST} (4 GiB), got {}",
                vault.kdf_memory_cost
            ),
        });
    }

    if !(1..=MAX_KDF_ITERATIONS).contains(&vault.kdf_iterations) {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_iterations must be between 1 and {MAX_KDF_ITERATIONS}, got {}",
                vault.kdf_iterations
            ),
        });
    }

    if !(1..=MAX_KDF_PARALLELISM).contains(&vault.kdf_parallelism) {
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_parallelism must be between 1 and {MAX_KDF_PARALLELISM}, got {}",
                vault.kdf_parallelism
            ),
        });
    } else if u64::from(vault.kdf_memory_cost) < 8 * u64::from(vault.kdf_parallelism) {
        // Argon2 needs at least 8 KiB per lane.
        errors.push(ConfigError::Validation {
            message: format!(
                "vault.kdf_memory_cost ({}) must be at least 8 x vault.kdf_parallelism ({})",
                vault.kdf_memory_cost, vault.kdf_parallelism
            ),
        });
    }

    if let Some(path) = &vault.path
        && path.as_os_str().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "vault.path must not be empty when set".to_string(),
        });
    }

    let level = config.log.normalized_level();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
