//! Entity transform functions and the legacy/fault guard
//!
//! The only surface external callers use: one encrypt/decrypt pair per
//! entity, built generically on top of the field policy table. Encrypting
//! replaces each sensitive field with a ciphertext envelope; decrypting
//! restores it, passing legacy plaintext values through unchanged and
//! substituting a safe default when a stored envelope cannot be recovered.
//!
//! All operations are pure functions over in-memory records: the input is
//! never mutated and nothing here performs I/O. [`FieldShield`] is `Send +
//! Sync`, so one instance can serve any number of threads.

use serde_json::{Map, Value};
use tracing::warn;

use super::policy::Entity;
use crate::crypto::{Codec, MasterKey};
use crate::error::ShieldResult;

/// A record as exchanged with the storage collaborator
///
/// Field values are numbers, strings, or string-keyed maps; fields not named
/// in an entity's policy pass through every transform byte-for-byte.
pub type Record = Map<String, Value>;

/// Encrypts and decrypts the sensitive fields of finance records
pub struct FieldShield {
    codec: Codec,
}

impl FieldShield {
    /// Build a shield from the master key
    pub fn new(key: MasterKey) -> Self {
        Self {
            codec: Codec::new(key),
        }
    }

    /// Build a shield from a base64 master key in the given environment
    /// variable
    ///
    /// Fails with [`ShieldError::KeyUnavailable`](crate::ShieldError) when
    /// the variable is unset or does not hold a 32-byte key. Call this once
    /// at process start; the error is a deployment fault and must not be
    /// swallowed.
    pub fn from_env(var: &str) -> ShieldResult<Self> {
        Ok(Self::new(MasterKey::from_env(var)?))
    }

    /// Encrypt every policy field of `entity` present in the record
    ///
    /// Policy fields absent from the record are skipped, so callers may
    /// supply partial records. A field whose value does not match its
    /// adapter's shape fails the whole call; writing a silently wrong value
    /// is worse than failing the write.
    pub fn encrypt_record(&self, entity: Entity, record: &Record) -> ShieldResult<Record> {
        let mut out = record.clone();
        for rule in entity.policy() {
            let Some(value) = record.get(rule.field) else {
                continue;
            };
            let plaintext = rule.adapter.serialize(value)?;
            let envelope = self.codec.encode(&plaintext)?;
            out.insert(rule.field.to_string(), Value::String(envelope));
        }
        Ok(out)
    }

    /// Decrypt every policy field of `entity` present in the record
    ///
    /// Total over any stored record: a non-string value predates encryption
    /// and passes through unchanged, and a string that fails decryption or
    /// parsing is replaced by the adapter's safe default (`0` or `{}`) with
    /// a structured warning. One unrecoverable monetary cell never blanks
    /// the rest of the record.
    pub fn decrypt_record(&self, entity: Entity, record: &Record) -> Record {
        let mut out = record.clone();
        for rule in entity.policy() {
            let Some(value) = record.get(rule.field) else {
                continue;
            };
            // Inspect: only strings can be envelopes; anything else is
            // legacy plaintext written before encryption was introduced
            let Value::String(envelope) = value else {
                continue;
            };
            let recovered = self
                .codec
                .decode(envelope)
                .and_then(|plaintext| rule.adapter.deserialize(&plaintext));
            let replacement = match recovered {
                Ok(restored) => restored,
                Err(err) => {
                    warn!(
                        entity = entity.as_str(),
                        field = rule.field,
                        error = err.kind(),
                        "failed to recover encrypted field, substituting default"
                    );
                    rule.adapter.default_value()
                }
            };
            out.insert(rule.field.to_string(), replacement);
        }
        out
    }

    /// Encrypt a borrowing record (EMI amount, borrowed amount, payment notes)
    pub fn encrypt_borrowing_data(&self, record: &Record) -> ShieldResult<Record> {
        self.encrypt_record(Entity::Borrowing, record)
    }

    /// Decrypt a borrowing record
    pub fn decrypt_borrowing_data(&self, record: &Record) -> Record {
        self.decrypt_record(Entity::Borrowing, record)
    }

    /// Encrypt a goal record (target amount, current balance)
    pub fn encrypt_goal_data(&self, record: &Record) -> ShieldResult<Record> {
        self.encrypt_record(Entity::Goal, record)
    }

    /// Decrypt a goal record
    pub fn decrypt_goal_data(&self, record: &Record) -> Record {
        self.decrypt_record(Entity::Goal, record)
    }

    /// Encrypt a contribution record
    pub fn encrypt_contribution_data(&self, record: &Record) -> ShieldResult<Record> {
        self.encrypt_record(Entity::Contribution, record)
    }

    /// Decrypt a contribution record
    pub fn decrypt_contribution_data(&self, record: &Record) -> Record {
        self.decrypt_record(Entity::Contribution, record)
    }

    /// Encrypt an income record
    pub fn encrypt_income_data(&self, record: &Record) -> ShieldResult<Record> {
        self.encrypt_record(Entity::Income, record)
    }

    /// Decrypt an income record
    pub fn decrypt_income_data(&self, record: &Record) -> Record {
        self.decrypt_record(Entity::Income, record)
    }

    /// Encrypt an allocation record
    pub fn encrypt_allocation_data(&self, record: &Record) -> ShieldResult<Record> {
        self.encrypt_record(Entity::Allocation, record)
    }

    /// Decrypt an allocation record
    pub fn decrypt_allocation_data(&self, record: &Record) -> Record {
        self.decrypt_record(Entity::Allocation, record)
    }
}
