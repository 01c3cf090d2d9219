// SPDX-FileCopyrightText: 2026 SecureTOTP Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-CBC encrypt/decrypt with PKCS#7 padding.
//!
//! Every call to [`encrypt`] draws a fresh random 128-bit IV from the system
//! CSPRNG and prepends it to the output. CBC provides confidentiality only;
//! corruption is caught by the header checksum and the padding check.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use ring::rand::{SecureRandom, SystemRandom};
use securetotp_core::{VaultError, KEY_LEN};
use zeroize::Zeroizing;

/// AES block size, which is also the IV length.
pub const BLOCK_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Encrypt plaintext, returning `IV || ciphertext blocks`.
///
/// The output is always `BLOCK_LEN + (len / BLOCK_LEN + 1) * BLOCK_LEN`
/// bytes: PKCS#7 adds a full block when the input is already aligned.
pub fn encrypt(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, VaultError> {
    let iv = generate_iv()?;
    let cipher = Aes256CbcEnc::new_from_slices(key, &iv)
        .map_err(|_| VaultError::Internal("failed to create AES-256-CBC cipher".to_string()))?;

    let body = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut out = Vec::with_capacity(BLOCK_LEN + body.len());
    out.extend_from_slice(&iv);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decrypt `IV || ciphertext blocks` and strip the padding.
///
/// A wrong key and corrupted data both surface as
/// [`VaultError::DecryptionFailed`]; the two cases are not distinguished.
pub fn decrypt(key: &[u8; KEY_LEN], ciphertext: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    if ciphertext.len() <= BLOCK_LEN {
        return Err(VaultError::InsufficientCiphertext);
    }

    let (iv, body) = ciphertext.split_at(BLOCK_LEN);
    let cipher = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| VaultError::Internal("failed to create AES-256-CBC cipher".to_string()))?;

    // Unaligned bodies and bad padding fail the same way.
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(body)
        .map(Zeroizing::new)
        .map_err(|_| VaultError::DecryptionFailed)
}

/// Generate a random 16-byte IV.
fn generate_iv() -> Result<[u8; BLOCK_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut iv = [0u8; BLOCK_LEN];
    rng.fill(&mut iv)
        .map_err(|_| VaultError::Internal("failed to generate random IV".to_string()))?;
    Ok(iv)
}
