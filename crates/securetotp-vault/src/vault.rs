// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: create, rekey, save, and load an encrypted vault file.
//!
//! Saves never overwrite the target in place:
//! - The header and ciphertext go to `<path>.temp` and are fsynced.
//! - The temp file is loaded back with the in-memory key and must reproduce
//!   the payload exactly.
//! - Only then is it renamed over `<path>`. Any failure leaves the previous
//!   file untouched.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use securetotp_core::{KdfDispatch, SecretKey, VaultError};
use serde::Serialize;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::checksum::crc64;
use crate::crypto;
use crate::format::{VaultHeader, FILE_MAGIC, HEADER_LEN};

/// Suffix appended to the target path for the in-progress write.
pub const TEMP_SUFFIX: &str = ".temp";

/// An open vault: header, derived key, and decrypted payload.
///
/// Debug output intentionally omits the key and payload.
pub struct Vault {
    header: VaultHeader,
    key: SecretKey,
    data: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("header", &self.header)
            .field("key", &"[REDACTED]")
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl Vault {
    /// Check whether a vault file exists at `path`.
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Create an in-memory vault with a fresh salt and empty payload.
    ///
    /// Nothing touches disk until [`Vault::save`].
    pub fn init<D>(format_version: u32, dispatch: &D) -> Result<Self, VaultError>
    where
        D: KdfDispatch + ?Sized,
    {
        let (record, key) = dispatch.derive(None, format_version)?;
        let mut header = VaultHeader::new(format_version, record);
        header.timestamp = unix_now();

        debug!(format_version, "vault initialized");
        Ok(Self {
            header,
            key,
            data: Zeroizing::new(Vec::new()),
        })
    }

    /// Replace the key with one derived from new credentials and a fresh
    /// salt, keeping the payload. Takes effect on disk at the next save.
    pub fn rekey<D>(&mut self, format_version: u32, dispatch: &D) -> Result<(), VaultError>
    where
        D: KdfDispatch + ?Sized,
    {
        let (record, key) = dispatch.derive(None, format_version)?;
        let mut header = VaultHeader::new(format_version, record);
        header.timestamp = self.header.timestamp;
        self.header = header;
        self.key = key;
        debug!(format_version, "vault rekeyed");
        Ok(())
    }

    /// The decrypted payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The header as last loaded or committed.
    pub fn header(&self) -> &VaultHeader {
        &self.header
    }

    /// Replace the payload and save it to `path`.
    pub fn write_to_file(&mut self, path: &Path, plaintext: &[u8]) -> Result<(), VaultError> {
        self.data = Zeroizing::new(plaintext.to_vec());
        self.save(path)
    }

    /// Encrypt the current payload and atomically commit it to `path`.
    pub fn save(&mut self, path: &Path) -> Result<(), VaultError> {
        let temp = temp_path(path);

        let ciphertext = crypto::encrypt(&self.key, &self.data)?;
        let ciphertext_len = u32::try_from(ciphertext.len()).map_err(|_| {
            VaultError::Internal(format!(
                "ciphertext of {} bytes exceeds the format limit",
                ciphertext.len()
            ))
        })?;

        let mut header = self.header.clone();
        header.checksum = crc64(&ciphertext);
        header.ciphertext_len = ciphertext_len;
        header.timestamp = unix_now();
        let encoded = header.encode()?;

        if let Err(err) = write_temp(&temp, &encoded, &ciphertext) {
            discard_temp(&temp);
            return Err(err);
        }

        if let Err(err) = self.verify(&temp) {
            warn!(temp = %temp.display(), error = %err, "saved vault failed verification");
            discard_temp(&temp);
            return Err(VaultError::VerificationFailed {
                path: temp,
                reason: err.to_string(),
            });
        }

        if let Err(err) = fs::rename(&temp, path) {
            discard_temp(&temp);
            return Err(VaultError::io(path, err));
        }
        sync_parent_dir(path);

        self.header = header;
        info!(
            path = %path.display(),
            bytes = ciphertext_len,
            "vault saved"
        );
        Ok(())
    }

    /// Load and decrypt a vault, deriving its key through `dispatch`.
    pub fn load_from_file<D>(path: &Path, dispatch: &D) -> Result<Self, VaultError>
    where
        D: KdfDispatch + ?Sized,
    {
        let (file, file_len, header) = open_checked(path)?;
        let (_, key) = dispatch.derive(Some(&header.kdf), header.format_version)?;
        Self::finish_load(path, file, file_len, header, key)
    }

    /// Load and decrypt a vault with an already-derived key.
    pub fn load_with_key(path: &Path, key: SecretKey) -> Result<Self, VaultError> {
        let (file, file_len, header) = open_checked(path)?;
        Self::finish_load(path, file, file_len, header, key)
    }

    /// Summary of the header for display.
    pub fn file_info(&self) -> FileInfo {
        FileInfo::from_header(&self.header)
    }

    fn verify(&self, temp: &Path) -> Result<(), VaultError> {
        let reloaded = Self::load_with_key(temp, self.key.clone())?;
        if reloaded.data() != self.data() {
            return Err(VaultError::Internal(
                "reloaded payload differs from the saved payload".to_string(),
            ));
        }
        Ok(())
    }

    fn finish_load(
        path: &Path,
        mut file: File,
        file_len: u64,
        header: VaultHeader,
        key: SecretKey,
    ) -> Result<Self, VaultError> {
        if key.iter().all(|&b| b == 0) {
            return Err(VaultError::EmptyKey);
        }

        let actual = file_len - HEADER_LEN as u64;
        let expected = u64::from(header.ciphertext_len);
        if actual != expected {
            return Err(VaultError::BadLength { expected, actual });
        }

        let mut ciphertext = vec![0u8; header.ciphertext_len as usize];
        file.read_exact(&mut ciphertext)
            .map_err(|e| VaultError::io(path, e))?;

        let checksum = crc64(&ciphertext);
        if checksum != header.checksum {
            return Err(VaultError::BadChecksum {
                expected: header.checksum,
                actual: checksum,
            });
        }

        let data = crypto::decrypt(&key, &ciphertext)?;
        debug!(path = %path.display(), bytes = data.len(), "vault loaded");
        Ok(Self { header, key, data })
    }
}

/// Human- and machine-readable summary of a vault header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    /// Last save time, RFC 3339 in local time.
    pub timestamp: String,
    pub format_version: u32,
    /// Lowercase hex.
    pub salt: String,
    pub kdf_id: String,
    pub kdf_version: i32,
    pub kdf_params: String,
    pub ciphertext_len: u32,
}

impl FileInfo {
    fn from_header(header: &VaultHeader) -> Self {
        let timestamp = i64::try_from(header.timestamp)
            .ok()
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .map(|utc| utc.with_timezone(&Local).to_rfc3339())
            .unwrap_or_else(|| header.timestamp.to_string());

        Self {
            timestamp,
            format_version: header.format_version,
            salt: hex::encode(header.kdf.salt),
            kdf_id: header.kdf.kdf_id.clone(),
            kdf_version: header.kdf.kdf_version,
            kdf_params: header.kdf.param_string.clone(),
            ciphertext_len: header.ciphertext_len,
        }
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestamp:        {}", self.timestamp)?;
        writeln!(f, "Format version:   {}", self.format_version)?;
        writeln!(f, "Salt:             {}", self.salt)?;
        writeln!(f, "KDF:              {}", self.kdf_id)?;
        writeln!(f, "KDF version:      {}", self.kdf_version)?;
        writeln!(f, "KDF params:       {}", self.kdf_params)?;
        write!(f, "Ciphertext bytes: {}", self.ciphertext_len)
    }
}

/// `<path>.temp`, next to the target so the rename stays on one filesystem.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}

/// Open `path`, read the fixed header, and check the magic.
fn open_checked(path: &Path) -> Result<(File, u64, VaultHeader), VaultError> {
    let mut file = File::open(path).map_err(|e| VaultError::io(path, e))?;
    let file_len = file
        .metadata()
        .map_err(|e| VaultError::io(path, e))?
        .len();

    if file_len < HEADER_LEN as u64 {
        return Err(VaultError::TruncatedHeader {
            expected: HEADER_LEN,
            actual: file_len as usize,
        });
    }

    let mut buf = [0u8; HEADER_LEN];
    file.read_exact(&mut buf)
        .map_err(|e| VaultError::io(path, e))?;
    let header = VaultHeader::decode(&buf);

    if header.magic != FILE_MAGIC {
        return Err(VaultError::BadMagic);
    }
    Ok((file, file_len, header))
}

fn write_temp(temp: &Path, header: &[u8], ciphertext: &[u8]) -> Result<(), VaultError> {
    match fs::remove_file(temp) {
        Ok(()) => debug!(temp = %temp.display(), "removed stale temp file"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(VaultError::io(temp, e)),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(temp).map_err(|e| VaultError::io(temp, e))?;
    file.write_all(header)
        .and_then(|()| file.write_all(ciphertext))
        .and_then(|()| file.sync_all())
        .map_err(|e| VaultError::io(temp, e))
}

fn discard_temp(temp: &Path) {
    if temp.is_file()
        && let Err(e) = fs::remove_file(temp)
    {
        warn!(temp = %temp.display(), error = %e, "failed to remove temp file");
    }
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if let Err(e) = File::open(parent).and_then(|dir| dir.sync_all()) {
        warn!(dir = %parent.display(), error = %e, "failed to fsync vault directory");
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
