// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-size on-disk header codec.
//!
//! All integers are little-endian. Layout (byte offsets):
//!
//! ```text
//!   0  u64   magic            0xB0C961D9
//!   8  u32   format_version
//!  12  u32   reserved         0
//!  16  u64   checksum         CRC-64/XZ of the ciphertext region
//!  24  u64   timestamp        unix seconds at save time
//!  32  u32   ciphertext_len
//!  36  u32   reserved2        0
//!  40  [32]  salt
//!  72  [16]  kdf_id           NUL-padded ASCII
//!  88  i32   kdf_version
//!  92  [64]  param_string     NUL-padded ASCII
//! 156        ciphertext region (IV || AES-CBC blocks)
//! ```

use securetotp_core::{KdfRecord, VaultError, SALT_LEN};

/// First eight bytes of every vault file.
pub const FILE_MAGIC: u64 = 0xB0C9_61D9;

/// Total encoded header length.
pub const HEADER_LEN: usize = 156;

/// Width of the NUL-padded KDF identifier field.
pub const KDF_ID_LEN: usize = 16;

/// Width of the NUL-padded parameter string field.
pub const PARAM_STRING_LEN: usize = 64;

/// Encoded width of the KDF record portion of the header.
pub const KDF_RECORD_LEN: usize = SALT_LEN + KDF_ID_LEN + 4 + PARAM_STRING_LEN;

/// Decoded vault header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    pub magic: u64,
    pub format_version: u32,
    pub reserved: u32,
    pub checksum: u64,
    pub timestamp: u64,
    pub ciphertext_len: u32,
    pub reserved2: u32,
    pub kdf: KdfRecord,
}

impl VaultHeader {
    /// A header for a vault that has not been written yet. Checksum,
    /// timestamp, and length are filled in at save time.
    pub fn new(format_version: u32, kdf: KdfRecord) -> Self {
        Self {
            magic: FILE_MAGIC,
            format_version,
            reserved: 0,
            checksum: 0,
            timestamp: 0,
            ciphertext_len: 0,
            reserved2: 0,
            kdf,
        }
    }

    /// Serialize to the fixed 156-byte layout.
    ///
    /// Fails with [`VaultError::Internal`] if a text field does not fit its
    /// slot or is not plain ASCII without NULs.
    pub fn encode(&self) -> Result<[u8; HEADER_LEN], VaultError> {
        let mut buf = [0u8; HEADER_LEN];
        let mut w = Writer::new(&mut buf);
        w.put_u64(self.magic);
        w.put_u32(self.format_version);
        w.put_u32(self.reserved);
        w.put_u64(self.checksum);
        w.put_u64(self.timestamp);
        w.put_u32(self.ciphertext_len);
        w.put_u32(self.reserved2);
        w.put_bytes(&self.kdf.salt);
        w.put_text("kdf_id", &self.kdf.kdf_id, KDF_ID_LEN)?;
        w.put_i32(self.kdf.kdf_version);
        w.put_text("param_string", &self.kdf.param_string, PARAM_STRING_LEN)?;
        debug_assert_eq!(w.pos, HEADER_LEN);
        Ok(buf)
    }

    /// Parse the fixed 156-byte layout. The magic is returned as read; the
    /// caller decides whether it is acceptable.
    pub fn decode(buf: &[u8; HEADER_LEN]) -> Self {
        let mut r = Reader::new(buf);
        let magic = r.u64();
        let format_version = r.u32();
        let reserved = r.u32();
        let checksum = r.u64();
        let timestamp = r.u64();
        let ciphertext_len = r.u32();
        let reserved2 = r.u32();
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(r.bytes(SALT_LEN));
        let kdf_id = r.text(KDF_ID_LEN);
        let kdf_version = r.i32();
        let param_string = r.text(PARAM_STRING_LEN);

        Self {
            magic,
            format_version,
            reserved,
            checksum,
            timestamp,
            ciphertext_len,
            reserved2,
            kdf: KdfRecord {
                salt,
                kdf_id,
                kdf_version,
                param_string,
            },
        }
    }
}

struct Writer<'a> {
    buf: &'a mut [u8; HEADER_LEN],
    pos: usize,
}

impl<'a> Writer<'a> {
    fn new(buf: &'a mut [u8; HEADER_LEN]) -> Self {
        Self { buf, pos: 0 }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    fn put_u32(&mut self, v: u32) {
        self.put_bytes(&v.to_le_bytes());
    }

    fn put_i32(&mut self, v: i32) {
        self.put_bytes(&v.to_le_bytes());
    }

    fn put_u64(&mut self, v: u64) {
        self.put_bytes(&v.to_le_bytes());
    }

    fn put_text(&mut self, field: &str, text: &str, width: usize) -> Result<(), VaultError> {
        if text.len() > width {
            return Err(VaultError::Internal(format!(
                "{field} `{text}` exceeds {width} bytes"
            )));
        }
        if !text.is_ascii() || text.contains('\0') {
            return Err(VaultError::Internal(format!(
                "{field} must be ASCII without NUL bytes"
            )));
        }
        self.put_bytes(text.as_bytes());
        self.pos += width - text.len();
        Ok(())
    }
}

struct Reader<'a> {
    buf: &'a [u8; HEADER_LEN],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8; HEADER_LEN]) -> Self {
        Self { buf, pos: 0 }
    }

    fn bytes(&mut self, n: usize) -> &'a [u8] {
        let buf: &'a [u8; HEADER_LEN] = self.buf;
        let out = &buf[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn array<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N));
        out
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.array())
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.array())
    }

    fn u64(&mut self) -> u64 {
        u64::from_le_bytes(self.array())
    }

    /// NUL-padded text; anything after the first NUL is ignored.
    fn text(&mut self, width: usize) -> String {
        let raw = self.bytes(width);
        let end = raw.iter().position(|&b| b == 0).unwrap_or(width);
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }
}
