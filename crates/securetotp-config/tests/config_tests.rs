// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SecureTOTP configuration system.

use std::path::Path;

use securetotp_config::diagnostic::ConfigError;
use securetotp_config::model::SecureTotpConfig;
use securetotp_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[vault]
path = "/home/alice/.securetotp-cli/work.vault"
kdf_memory_cost = 131072
kdf_iterations = 4
kdf_parallelism = 2

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(
        config.vault.path.as_deref(),
        Some(Path::new("/home/alice/.securetotp-cli/work.vault"))
    );
    assert_eq!(config.vault.kdf_memory_cost, 131072);
    assert_eq!(config.vault.kdf_iterations, 4);
    assert_eq!(config.vault.kdf_parallelism, 2);
    assert_eq!(config.log.level, "debug");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert!(config.vault.path.is_none());
    assert_eq!(config.vault.kdf_memory_cost, 65536);
    assert_eq!(config.vault.kdf_iterations, 3);
    assert_eq!(config.vault.kdf_parallelism, 1);
    assert_eq!(config.log.level, "warn");
}

/// Unknown field in [vault] is rejected with a suggestion.
#[test]
fn unknown_field_in_vault_produces_suggestion() {
    let toml = r#"
[vault]
kdf_iteration = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "kdf_iteration");
            assert_eq!(suggestion.as_deref(), Some("kdf_iterations"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown section");
    let err_str = err.to_string();
    assert!(
        err_str.contains("unknown field") || err_str.contains("telemetry"),
        "error should mention the unknown section, got: {err_str}"
    );
}

/// Wrong value type is reported as InvalidType with the dotted key path.
#[test]
fn wrong_type_is_reported_with_key_path() {
    let toml = r#"
[vault]
kdf_iterations = "three"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string iterations");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::InvalidType { key, .. } if key == "vault.kdf_iterations"
    )));
}

/// Parsed but semantically invalid values fail validation.
#[test]
fn validation_runs_after_parsing() {
    let toml = r#"
[vault]
kdf_memory_cost = 16
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::Validation { message } if message.contains("kdf_memory_cost")
    )));
}

/// Dotted overrides land in the right section.
#[test]
fn dotted_override_sets_vault_path() {
    use figment::{providers::Serialized, Figment};

    let config: SecureTotpConfig = Figment::new()
        .merge(Serialized::defaults(SecureTotpConfig::default()))
        .merge(("vault.path", "/tmp/override.vault"))
        .extract()
        .expect("should set path via dot notation");

    assert_eq!(
        config.vault.path.as_deref(),
        Some(Path::new("/tmp/override.vault"))
    );
}

/// Missing config files are silently skipped.
#[test]
fn missing_config_files_silently_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    figment::Jail::expect_with(|_jail| {
        let config = securetotp_config::load_config(Some(&missing))?;
        assert_eq!(config.vault.kdf_iterations, 3);
        Ok(())
    });
}

/// Resolved path falls back to the home directory default.
#[test]
fn resolved_path_defaults_under_home() {
    let config = SecureTotpConfig::default();
    if let Some(path) = config.vault.resolved_path() {
        assert!(path.ends_with(".securetotp-cli/mytotp.vault"));
    }
}
