//! Secret obfuscation codec
//!
//! Secrets in the configuration file (WiFi password, upload auth token) can
//! be stored base64-encoded with a XOR cipher over a small device-derived
//! key, so a casual reader of the SD card does not see them in clear text.
//! This is deliberately NOT a cryptographic guarantee: the key is the
//! device's MAC address and there is no integrity check.
//!
//! The cipher is symmetric: the operator encodes offline with the same XOR
//! followed by base64 ([`encode`] is provided for that and for round-trip
//! tests).

use base64::engine::general_purpose::STANDARD;
use base64::{DecodeSliceError, Engine};

/// Key length in bytes
pub const KEY_LEN: usize = 6;

/// XOR key for the secret codec
///
/// One derivation rule is used everywhere: the device MAC address bytes in
/// reverse order. A fixed literal key can be supplied with
/// [`SecretKey::new`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretKey {
    bytes: [u8; KEY_LEN],
}

impl SecretKey {
    /// Key from literal bytes
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Key derived from the device MAC address (bytes reversed)
    pub fn from_mac(mac: &[u8; KEY_LEN]) -> Self {
        let mut bytes = *mac;
        bytes.reverse();
        Self { bytes }
    }

    /// Key bytes
    pub fn bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Secret codec errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretError {
    /// The ciphertext is not valid base64
    InvalidBase64,
    /// The decoded plaintext is not valid UTF-8
    InvalidUtf8,
    /// The decoded data does not fit the scratch buffer
    TooLong,
}

/// Decode an obfuscated value
///
/// Base64-decodes `b64` into `buf`, XORs each byte with `key[i mod KEY_LEN]`
/// and returns the resulting string slice.
///
/// # Errors
///
/// See [`SecretError`].
pub fn decode<'a>(
    b64: &str,
    key: &SecretKey,
    buf: &'a mut [u8],
) -> Result<&'a str, SecretError> {
    let len = STANDARD
        .decode_slice(b64.as_bytes(), buf)
        .map_err(|e| match e {
            DecodeSliceError::OutputSliceTooSmall => SecretError::TooLong,
            DecodeSliceError::DecodeError(_) => SecretError::InvalidBase64,
        })?;
    for (i, byte) in buf[..len].iter_mut().enumerate() {
        *byte ^= key.bytes[i % KEY_LEN];
    }
    core::str::from_utf8(&buf[..len]).map_err(|_| SecretError::InvalidUtf8)
}

/// Encode a plaintext value (operator-side helper)
///
/// XORs `plain` with the key and base64-encodes the result into `buf`.
///
/// # Errors
///
/// Returns `SecretError::TooLong` when the encoded form does not fit `buf`.
pub fn encode<'a>(
    plain: &str,
    key: &SecretKey,
    buf: &'a mut [u8],
) -> Result<&'a str, SecretError> {
    let mut cipher = [0u8; 192];
    let src = plain.as_bytes();
    if src.len() > cipher.len() {
        return Err(SecretError::TooLong);
    }
    for (i, &byte) in src.iter().enumerate() {
        cipher[i] = byte ^ key.bytes[i % KEY_LEN];
    }
    let len = STANDARD
        .encode_slice(&cipher[..src.len()], buf)
        .map_err(|_| SecretError::TooLong)?;
    // encode_slice only emits ASCII
    core::str::from_utf8(&buf[..len]).map_err(|_| SecretError::InvalidUtf8)
}
