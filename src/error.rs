//! Custom error types for ledger-shield
//!
//! This module defines the error taxonomy for the encryption core using
//! thiserror for ergonomic error definitions. Error messages never contain
//! field values or key material, since they flow into structured logs.

use thiserror::Error;

/// The main error type for ledger-shield operations
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Ciphertext failed its integrity check (tampered data or wrong key)
    #[error("authentication failed: ciphertext did not verify")]
    Authentication,

    /// The envelope string could not be parsed into its sections
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Decrypted plaintext does not match the adapter's expected shape
    #[error("value format error: {0}")]
    ValueFormat(String),

    /// The master key is missing or unusable at startup
    ///
    /// This error is fatal and must surface to the caller; swallowing it
    /// would mean reading or writing unprotected data unintentionally.
    #[error("master key unavailable: {0}")]
    KeyUnavailable(String),
}

impl ShieldError {
    /// Short label for this error kind, used in structured log events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::MalformedEnvelope(_) => "malformed_envelope",
            Self::ValueFormat(_) => "value_format",
            Self::KeyUnavailable(_) => "key_unavailable",
        }
    }

    /// Check whether the decrypt-path guard may substitute a default for
    /// this error; `KeyUnavailable` is the one kind that must propagate
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::KeyUnavailable(_))
    }
}

/// Result type alias for ledger-shield operations
pub type ShieldResult<T> = Result<T, ShieldError>;
