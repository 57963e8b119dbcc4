//! ledger-shield - Field-level encryption for personal-finance records
//!
//! This library implements the encryption layer of a personal-finance
//! tracker. Sensitive monetary fields (loan/EMI amounts, goal balances,
//! contribution and income amounts, allocation amounts, and per-month
//! payment-detail maps) are encrypted with AES-256-GCM before records reach
//! a shared, operator-visible datastore, and transparently restored on read.
//! Records written before encryption was introduced decrypt cleanly: values
//! already in plaintext form pass through unchanged.
//!
//! # Architecture
//!
//! - `error`: the error taxonomy and result alias
//! - `crypto`: master key handling and the ciphertext envelope codec
//! - `fields`: value adapters, the per-entity field policy table, and the
//!   entity transform functions callers use
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_shield::FieldShield;
//! use serde_json::json;
//!
//! let shield = FieldShield::from_env("LEDGER_MASTER_KEY")?;
//!
//! let record = json!({"amount": 85000, "source": "salary"});
//! let stored = shield.encrypt_income_data(record.as_object().unwrap())?;
//! let restored = shield.decrypt_income_data(&stored);
//! ```

pub mod crypto;
pub mod error;
pub mod fields;

pub use crypto::MasterKey;
pub use error::{ShieldError, ShieldResult};
pub use fields::{AdapterKind, Entity, FieldShield, Record};
