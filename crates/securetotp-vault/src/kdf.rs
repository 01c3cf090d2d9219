// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase and key-file key derivation.
//!
//! The passphrase (behind a fixed domain prefix) and the optional key file
//! are folded into a 64-byte SHA3-512 digest, which is then fed to Argon2id
//! (`Algorithm::Argon2id`, `Version::V0x13`) to produce the 32-byte vault key.
//! The derivation is bit-exact with existing vault files.

use std::fmt;
use std::path::Path;

use ring::rand::{SecureRandom, SystemRandom};
use securetotp_core::{KdfFamily, KdfRecord, SecretKey, VaultError, KEY_LEN, SALT_LEN};
use sha3::{Digest, Sha3_512};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Domain-separation prefix hashed in front of every passphrase.
///
/// Not a secret: it is identical for every vault.
pub const PASSPHRASE_PREFIX: &[u8] = b"c81,T68#1af@77d96;6d";

/// Argon2 algorithm revision recorded in vault headers (0x13).
pub const ARGON2_VERSION: i32 = argon2::Version::V0x13 as i32;

/// Length of the SHA3-512 stretched secret.
pub const STRETCHED_LEN: usize = 64;

/// Largest memory cost accepted, in KiB (4 GiB). Headers are not covered by
/// the checksum, so stored costs are bounded before Argon2 allocates.
pub const MAX_MEMORY_COST: u32 = 4 * 1024 * 1024;

/// Largest pass count accepted.
pub const MAX_ITERATIONS: u32 = 1024;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Number of passes.
    pub iterations: u32,
    /// Lanes. Stored vaults encode this in a single byte.
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536,
            iterations: 3,
            parallelism: 1,
        }
    }
}

impl fmt::Display for KdfParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "m={}&t={}&p={}",
            self.memory_cost, self.iterations, self.parallelism
        )
    }
}

impl KdfParams {
    /// Render as the URL-query form persisted in vault headers.
    pub fn to_param_string(&self) -> String {
        self.to_string()
    }

    /// Parse a persisted `m=..&t=..&p=..` query string.
    ///
    /// Pair order does not matter and unrecognized keys are ignored; the
    /// first occurrence of a repeated key wins. Missing, non-numeric, or zero
    /// costs are rejected rather than handed to Argon2.
    pub fn parse(param_string: &str) -> Result<Self, VaultError> {
        let mut memory_cost = None;
        let mut iterations = None;
        let mut parallelism = None;

        for pair in param_string.split('&').filter(|p| !p.is_empty()) {
            if pair.contains(';') {
                return Err(VaultError::InvalidKdfParams(format!(
                    "invalid separator in `{param_string}`"
                )));
            }
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            let slot = match name {
                "m" => &mut memory_cost,
                "t" => &mut iterations,
                "p" => &mut parallelism,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(parse_cost(name, value)?);
            }
        }

        let params = Self {
            memory_cost: memory_cost.ok_or_else(|| missing("m", param_string))?,
            iterations: iterations.ok_or_else(|| missing("t", param_string))?,
            parallelism: parallelism.ok_or_else(|| missing("p", param_string))?,
        };
        params.validate()?;
        Ok(params)
    }

    /// Reject cost parameters Argon2 would refuse, that cannot be persisted,
    /// or that exceed the supported ceilings.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.memory_cost == 0 || self.iterations == 0 || self.parallelism == 0 {
            return Err(VaultError::InvalidKdfParams(format!(
                "zero cost parameter in `{self}`"
            )));
        }
        if self.memory_cost > MAX_MEMORY_COST {
            return Err(VaultError::InvalidKdfParams(format!(
                "memory cost {} KiB exceeds {MAX_MEMORY_COST} KiB",
                self.memory_cost
            )));
        }
        if self.iterations > MAX_ITERATIONS {
            return Err(VaultError::InvalidKdfParams(format!(
                "iterations {} exceed {MAX_ITERATIONS}",
                self.iterations
            )));
        }
        if self.parallelism > u32::from(u8::MAX) {
            return Err(VaultError::InvalidKdfParams(format!(
                "parallelism {} exceeds {}",
                self.parallelism,
                u8::MAX
            )));
        }
        if u64::from(self.memory_cost) < 8 * u64::from(self.parallelism) {
            return Err(VaultError::InvalidKdfParams(format!(
                "memory cost {} KiB is below 8 KiB per lane",
                self.memory_cost
            )));
        }
        Ok(())
    }
}

fn parse_cost(name: &str, value: &str) -> Result<u32, VaultError> {
    value.parse::<u32>().map_err(|e| {
        VaultError::InvalidKdfParams(format!("`{name}={value}` is not a valid cost: {e}"))
    })
}

fn missing(name: &str, param_string: &str) -> VaultError {
    VaultError::InvalidKdfParams(format!("`{name}` missing from `{param_string}`"))
}

/// A derived key together with the parameters that reproduce it.
pub struct DerivedKeyMaterial {
    /// The symmetric key. Never persisted.
    pub key: SecretKey,
    /// Salt, KDF identity, and cost parameters, persisted in the header.
    pub record: KdfRecord,
}

impl fmt::Debug for DerivedKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKeyMaterial")
            .field("key", &"[REDACTED]")
            .field("record", &self.record)
            .finish()
    }
}

/// Derive the vault key from credentials.
///
/// With `existing == None` a fresh salt is generated and `defaults` become
/// the recorded cost parameters. Otherwise the stored salt and
/// `param_string` are reused, so the same credentials reproduce the same key.
pub fn derive_key(
    passphrase: &[u8],
    key_file: Option<&Path>,
    existing: Option<&KdfRecord>,
    defaults: &KdfParams,
) -> Result<DerivedKeyMaterial, VaultError> {
    let record = match existing {
        None => {
            defaults.validate()?;
            KdfRecord {
                salt: generate_salt()?,
                kdf_id: KdfFamily::Argon2id.to_string(),
                kdf_version: ARGON2_VERSION,
                param_string: defaults.to_param_string(),
            }
        }
        Some(record) => {
            if record.kdf_id != KdfFamily::Argon2id.to_string() {
                return Err(VaultError::UnsupportedKdf(record.kdf_id.clone()));
            }
            record.clone()
        }
    };
    let params = KdfParams::parse(&record.param_string)?;

    let stretched = stretch_secret(passphrase, key_file)?;
    let key = argon2id(stretched.as_slice(), &record.salt, &params)?;

    debug!(params = %params, fresh_salt = existing.is_none(), "derived vault key");
    Ok(DerivedKeyMaterial { key, record })
}

/// Hash the optional key file and the prefixed passphrase into one
/// fixed-length secret.
pub fn stretch_secret(
    passphrase: &[u8],
    key_file: Option<&Path>,
) -> Result<Zeroizing<[u8; STRETCHED_LEN]>, VaultError> {
    let mut hasher = Sha3_512::new();

    if let Some(path) = key_file {
        let contents =
            Zeroizing::new(std::fs::read(path).map_err(|e| VaultError::io(path, e))?);
        warn!(
            key_file = %path.display(),
            "key file used for key derivation; keep it secure"
        );
        hasher.update(contents.as_slice());
    }

    hasher.update(PASSPHRASE_PREFIX);
    hasher.update(passphrase);

    let mut out = Zeroizing::new([0u8; STRETCHED_LEN]);
    out.copy_from_slice(&hasher.finalize());
    Ok(out)
}

/// Run Argon2id over `secret` with the given salt and costs.
pub fn argon2id(secret: &[u8], salt: &[u8], params: &KdfParams) -> Result<SecretKey, VaultError> {
    let argon_params = argon2::Params::new(
        params.memory_cost,
        params.iterations,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| VaultError::InvalidKdfParams(format!("invalid Argon2id parameters: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon_params,
    );

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(secret, salt, output.as_mut_slice())
        .map_err(|e| VaultError::InvalidKdfParams(format!("Argon2id key derivation failed: {e}")))?;

    Ok(output)
}

/// Generate a random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| VaultError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}
