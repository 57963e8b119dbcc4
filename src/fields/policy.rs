//! Static field policy for each business entity
//!
//! Declares which named fields of each record type are sensitive and which
//! adapter serializes them. The table is plain immutable data; the transform
//! layer drives all behavior off it.

use serde::{Deserialize, Serialize};

use super::adapters::AdapterKind;

/// A business entity whose records carry sensitive monetary fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    /// Loans and EMIs
    Borrowing,
    /// Savings goals
    Goal,
    /// Goal contributions
    Contribution,
    /// Income entries
    Income,
    /// Category allocations
    Allocation,
}

/// One sensitive field and the adapter that serializes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Field name as it appears in the record
    pub field: &'static str,
    /// Serialization applied before encryption
    pub adapter: AdapterKind,
}

const fn rule(field: &'static str, adapter: AdapterKind) -> FieldRule {
    FieldRule { field, adapter }
}

const BORROWING_FIELDS: &[FieldRule] = &[
    rule("emi_amount", AdapterKind::Numeric),
    rule("borrowing_amount", AdapterKind::Numeric),
    // Per-month payment notes are free text ("paid via UPI"), not amounts
    rule("payment_details", AdapterKind::TextMap),
];

const GOAL_FIELDS: &[FieldRule] = &[
    rule("target_amount", AdapterKind::Numeric),
    rule("current_balance", AdapterKind::Numeric),
];

const CONTRIBUTION_FIELDS: &[FieldRule] = &[rule("amount", AdapterKind::Numeric)];

const INCOME_FIELDS: &[FieldRule] = &[rule("amount", AdapterKind::Numeric)];

const ALLOCATION_FIELDS: &[FieldRule] = &[rule("allocation_amount", AdapterKind::Numeric)];

impl Entity {
    /// Sensitive fields for this entity, in declaration order
    pub fn policy(&self) -> &'static [FieldRule] {
        match self {
            Self::Borrowing => BORROWING_FIELDS,
            Self::Goal => GOAL_FIELDS,
            Self::Contribution => CONTRIBUTION_FIELDS,
            Self::Income => INCOME_FIELDS,
            Self::Allocation => ALLOCATION_FIELDS,
        }
    }

    /// Label used in structured log events
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Borrowing => "borrowing",
            Self::Goal => "goal",
            Self::Contribution => "contribution",
            Self::Income => "income",
            Self::Allocation => "allocation",
        }
    }
}
