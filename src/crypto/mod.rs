//! Cryptographic primitives for ledger-shield
//!
//! Provides AES-256-GCM ciphertext envelopes keyed by a process-wide
//! master key, with optional Argon2id passphrase derivation.

pub mod envelope;
pub mod key;

pub use envelope::Codec;
pub use key::MasterKey;
