// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for creating, saving, reopening, and rekeying vault files.

use std::fs;
use std::path::{Path, PathBuf};

use securetotp_core::{ErrorKind, KdfDispatch, KdfRecord, SecretKey, VaultError, KEY_LEN};
use securetotp_vault::vault::temp_path;
use securetotp_vault::{
    KdfParams, SchemeRegistry, StaticCredentials, Vault, FORMAT_VERSION_ARGON2ID, HEADER_LEN,
};
use zeroize::Zeroizing;

const PAYLOAD: &[u8] = b"payload-bytes";

/// Low Argon2 cost so the suite stays fast.
fn fast() -> KdfParams {
    KdfParams {
        memory_cost: 1024,
        iterations: 1,
        parallelism: 1,
    }
}

fn registry(passphrase: &str) -> SchemeRegistry {
    SchemeRegistry::with_defaults(Box::new(StaticCredentials::new(passphrase)), fast())
}

fn vault_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("mytotp.vault")
}

fn create(path: &Path, passphrase: &str, payload: &[u8]) {
    let mut vault = Vault::init(FORMAT_VERSION_ARGON2ID, &registry(passphrase)).unwrap();
    vault.write_to_file(path, payload).unwrap();
}

/// CBC is unauthenticated: a wrong key is caught by the padding check with
/// high probability, and otherwise yields bytes that differ from the payload.
fn assert_rejected(result: Result<Vault, VaultError>, payload: &[u8]) {
    match result {
        Err(err) => assert!(
            matches!(err, VaultError::DecryptionFailed),
            "expected DecryptionFailed, got {err:?}"
        ),
        Ok(vault) => assert_ne!(vault.data(), payload),
    }
}

fn patch(path: &Path, offset: usize, bytes: &[u8]) {
    let mut raw = fs::read(path).unwrap();
    raw[offset..offset + bytes.len()].copy_from_slice(bytes);
    fs::write(path, raw).unwrap();
}

#[test]
fn correct_passphrase_round_trips_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "correct-horse", PAYLOAD);

    let vault = Vault::load_from_file(&path, &registry("correct-horse")).unwrap();
    assert_eq!(vault.data(), PAYLOAD);
    assert_eq!(vault.header().format_version, FORMAT_VERSION_ARGON2ID);
    assert_eq!(vault.header().kdf.param_string, "m=1024&t=1&p=1");
}

#[test]
fn wrong_passphrase_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "correct-horse", PAYLOAD);

    assert_rejected(Vault::load_from_file(&path, &registry("wrong")), PAYLOAD);
}

#[test]
fn empty_payload_and_empty_passphrase_are_valid() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "", b"");

    let vault = Vault::load_from_file(&path, &registry("")).unwrap();
    assert!(vault.data().is_empty());
    assert_eq!(vault.header().ciphertext_len, 32);
}

#[test]
fn key_file_is_required_once_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    let key_file = dir.path().join("vault.key");
    fs::write(&key_file, b"0123456789abcdef").unwrap();

    let with_key_file = SchemeRegistry::with_defaults(
        Box::new(StaticCredentials::new("pw").with_key_file(&key_file)),
        fast(),
    );
    let mut vault = Vault::init(FORMAT_VERSION_ARGON2ID, &with_key_file).unwrap();
    vault.write_to_file(&path, PAYLOAD).unwrap();

    let reopened = Vault::load_from_file(&path, &with_key_file).unwrap();
    assert_eq!(reopened.data(), PAYLOAD);
    assert_rejected(Vault::load_from_file(&path, &registry("pw")), PAYLOAD);
}

#[test]
fn ciphertext_bit_flip_fails_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);

    let mut raw = fs::read(&path).unwrap();
    raw[HEADER_LEN + 20] ^= 0x01;
    fs::write(&path, raw).unwrap();

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::BadChecksum { .. }));
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn tamper_with_recomputed_checksum_fails_padding() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);

    // 13-byte payload: one block, pad byte 0x03. Flipping the high bit of
    // the IV's last byte turns the final plaintext byte into 0x83.
    let mut raw = fs::read(&path).unwrap();
    raw[HEADER_LEN + 15] ^= 0x80;
    let checksum = securetotp_vault::checksum::crc64(&raw[HEADER_LEN..]);
    raw[16..24].copy_from_slice(&checksum.to_le_bytes());
    fs::write(&path, raw).unwrap();

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::DecryptionFailed));
}

#[test]
fn bad_magic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);
    patch(&path, 0, &[0u8; 8]);

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::BadMagic));
}

#[test]
fn short_file_is_truncated_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    fs::write(&path, [0u8; 100]).unwrap();

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(
        err,
        VaultError::TruncatedHeader {
            expected: HEADER_LEN,
            actual: 100
        }
    ));
}

#[test]
fn trailing_bytes_are_bad_length() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);

    let mut raw = fs::read(&path).unwrap();
    raw.push(0);
    fs::write(&path, raw).unwrap();

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(
        err,
        VaultError::BadLength {
            expected: 32,
            actual: 33
        }
    ));
}

#[test]
fn unknown_format_version_is_rejected() {
    let err = Vault::init(999, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::UnknownFormatVersion(999)));

    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);
    patch(&path, 8, &999u32.to_le_bytes());

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::UnknownFormatVersion(999)));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn unsupported_kdf_id_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);
    patch(&path, 72, b"scrypt\0\0");

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::UnsupportedKdf(id) if id == "scrypt"));
}

#[test]
fn oversized_stored_memory_cost_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);

    let mut params = [0u8; 64];
    params[..20].copy_from_slice(b"m=4000000000&t=1&p=1");
    patch(&path, 92, &params);

    let err = Vault::load_from_file(&path, &registry("pw")).unwrap_err();
    assert!(matches!(err, VaultError::InvalidKdfParams(_)), "got {err:?}");
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Vault::load_from_file(&vault_path(&dir), &registry("pw")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

#[test]
fn stale_temp_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    fs::write(temp_path(&path), b"left over from a crash").unwrap();

    create(&path, "pw", PAYLOAD);

    assert!(!temp_path(&path).exists());
    let vault = Vault::load_from_file(&path, &registry("pw")).unwrap();
    assert_eq!(vault.data(), PAYLOAD);
}

#[test]
fn failed_temp_write_leaves_original_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);
    let before = fs::read(&path).unwrap();

    // A directory in the temp slot cannot be removed or opened as a file.
    fs::create_dir(temp_path(&path)).unwrap();
    let mut vault = Vault::load_from_file(&path, &registry("pw")).unwrap();
    let err = vault.write_to_file(&path, b"replacement").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);

    assert_eq!(fs::read(&path).unwrap(), before);
    let reopened = Vault::load_from_file(&path, &registry("pw")).unwrap();
    assert_eq!(reopened.data(), PAYLOAD);
}

#[test]
fn failed_verification_leaves_original_intact() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);
    let before = fs::read(&path).unwrap();

    // An all-zero key writes a file that cannot be reopened.
    let (record, _) = registry("pw").derive(None, FORMAT_VERSION_ARGON2ID).unwrap();
    let zero_key = move |_: Option<&KdfRecord>, _: u32| -> Result<(KdfRecord, SecretKey), VaultError> {
        Ok((record.clone(), Zeroizing::new([0u8; KEY_LEN])))
    };
    let mut vault = Vault::init(FORMAT_VERSION_ARGON2ID, &zero_key).unwrap();
    let err = vault.write_to_file(&path, b"replacement").unwrap_err();

    assert!(matches!(err, VaultError::VerificationFailed { .. }));
    assert!(!temp_path(&path).exists());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn rekey_changes_passphrase() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "old-pass", PAYLOAD);
    let old_salt = Vault::load_from_file(&path, &registry("old-pass"))
        .unwrap()
        .header()
        .kdf
        .salt;

    let mut vault = Vault::load_from_file(&path, &registry("old-pass")).unwrap();
    vault
        .rekey(FORMAT_VERSION_ARGON2ID, &registry("new-pass"))
        .unwrap();
    vault.save(&path).unwrap();

    let reopened = Vault::load_from_file(&path, &registry("new-pass")).unwrap();
    assert_eq!(reopened.data(), PAYLOAD);
    assert_ne!(reopened.header().kdf.salt, old_salt);
    assert_rejected(Vault::load_from_file(&path, &registry("old-pass")), PAYLOAD);
}

#[test]
fn overwrite_replaces_payload() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);

    let mut vault = Vault::load_from_file(&path, &registry("pw")).unwrap();
    vault.write_to_file(&path, b"second revision").unwrap();

    let reopened = Vault::load_from_file(&path, &registry("pw")).unwrap();
    assert_eq!(reopened.data(), b"second revision");
}

#[test]
fn file_info_reflects_saved_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = vault_path(&dir);
    create(&path, "pw", PAYLOAD);

    let vault = Vault::load_from_file(&path, &registry("pw")).unwrap();
    let info = vault.file_info();
    assert_eq!(info.format_version, 2);
    assert_eq!(info.kdf_id, "argon2id");
    assert_eq!(info.kdf_version, 19);
    assert_eq!(info.kdf_params, "m=1024&t=1&p=1");
    assert_eq!(info.salt.len(), 64);
    assert_eq!(info.ciphertext_len, 32);
}
