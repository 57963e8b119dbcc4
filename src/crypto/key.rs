//! Master key handling
//!
//! The master key is process-wide state: loaded once from an environment
//! variable or secret manager at startup, held only in memory, and zeroed
//! on drop. It is never logged, serialized, or included in error messages.
//!
//! Deployments that hand out a passphrase instead of raw key material can
//! derive the key with Argon2id via [`MasterKey::derive`].

use std::fmt;

use argon2::{Argon2, Params};
use base64::{engine::general_purpose::STANDARD, Engine};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ShieldError, ShieldResult};

/// Key size in bytes for AES-256
pub const KEY_SIZE: usize = 32;

/// Minimum salt length accepted for passphrase derivation
const MIN_SALT_LEN: usize = 8;

/// The single symmetric key protecting all sensitive fields
///
/// Construct it once at process start and hand it to
/// [`FieldShield::new`](crate::FieldShield::new); it is consumed by the
/// cipher and zeroed afterwards.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_SIZE],
}

impl MasterKey {
    /// Create a key from raw bytes
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Decode a key from standard base64 of exactly 32 bytes
    pub fn from_base64(encoded: &str) -> ShieldResult<Self> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|_| {
            ShieldError::KeyUnavailable("key material is not valid base64".to_string())
        })?;

        if bytes.len() != KEY_SIZE {
            return Err(ShieldError::KeyUnavailable(format!(
                "key material must be {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(&bytes);
        Ok(Self { key })
    }

    /// Read a base64-encoded key from an environment variable
    pub fn from_env(var: &str) -> ShieldResult<Self> {
        let encoded = std::env::var(var).map_err(|_| {
            ShieldError::KeyUnavailable(format!("environment variable {} is not set", var))
        })?;
        Self::from_base64(&encoded)
    }

    /// Derive a key from a passphrase using Argon2id
    ///
    /// The salt must be at least 8 bytes and stable across the deployment,
    /// so the same passphrase always derives the same key.
    pub fn derive(passphrase: &str, salt: &[u8]) -> ShieldResult<Self> {
        if salt.len() < MIN_SALT_LEN {
            return Err(ShieldError::KeyUnavailable(format!(
                "derivation salt must be at least {} bytes",
                MIN_SALT_LEN
            )));
        }

        // 64 MiB memory cost, 3 iterations, parallelism 4
        let params = Params::new(65536, 3, 4, Some(KEY_SIZE)).map_err(|e| {
            ShieldError::KeyUnavailable(format!("invalid Argon2 parameters: {}", e))
        })?;
        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

        let mut key = [0u8; KEY_SIZE];
        argon2
            .hash_password_into(passphrase.as_bytes(), salt, &mut key)
            .map_err(|e| ShieldError::KeyUnavailable(format!("key derivation failed: {}", e)))?;

        Ok(Self { key })
    }

    /// Get the key bytes
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

// Don't print the key in Debug output
impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base64_roundtrip() {
        let raw = [7u8; KEY_SIZE];
        let encoded = STANDARD.encode(raw);
        let key = MasterKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &raw);
    }

    #[test]
    fn test_from_base64_rejects_wrong_length() {
        let encoded = STANDARD.encode([1u8; 16]);
        let err = MasterKey::from_base64(&encoded).unwrap_err();
        assert!(matches!(err, ShieldError::KeyUnavailable(_)));
    }

    #[test]
    fn test_from_base64_rejects_garbage() {
        let err = MasterKey::from_base64("not base64 at all!").unwrap_err();
        assert!(matches!(err, ShieldError::KeyUnavailable(_)));
    }

    #[test]
    fn test_from_env_missing_variable() {
        let err = MasterKey::from_env("LEDGER_SHIELD_TEST_UNSET_KEY").unwrap_err();
        assert!(matches!(err, ShieldError::KeyUnavailable(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_derive_is_deterministic() {
        let key1 = MasterKey::derive("correct horse", b"fixed-salt-bytes").unwrap();
        let key2 = MasterKey::derive("correct horse", b"fixed-salt-bytes").unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_different_passphrase_different_key() {
        let key1 = MasterKey::derive("passphrase1", b"fixed-salt-bytes").unwrap();
        let key2 = MasterKey::derive("passphrase2", b"fixed-salt-bytes").unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_different_salt_different_key() {
        let key1 = MasterKey::derive("same", b"salt-number-one").unwrap();
        let key2 = MasterKey::derive("same", b"salt-number-two").unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_rejects_short_salt() {
        let err = MasterKey::derive("pass", b"short").unwrap_err();
        assert!(matches!(err, ShieldError::KeyUnavailable(_)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = MasterKey::from_bytes([42u8; KEY_SIZE]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("MasterKey"));
        assert!(!debug.contains("42"));
    }
}
