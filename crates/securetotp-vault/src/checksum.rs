// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CRC-64 over the ciphertext region.
//!
//! Uses the ECMA-182 polynomial with reflected input/output and inverted
//! init/final value (the "XZ" variant). Detects accidental corruption only.

use crc::{Crc, CRC_64_XZ};

const CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

/// Checksum a byte slice.
pub fn crc64(data: &[u8]) -> u64 {
    CRC64.checksum(data)
}
