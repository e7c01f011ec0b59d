use rust_decimal::Decimal;
use std::str::FromStr;

use super::{Transaction, TransactionType};
use crate::error::ValidationError;

/// The add/edit form as the user typed it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    pub kind: TransactionType,
}

/// A form that passed validation and may be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEntry {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionType,
}

impl TransactionForm {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        kind: TransactionType,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            kind,
        }
    }

    /// Prefill from an existing record for editing.
    pub fn from_transaction(txn: &Transaction) -> Self {
        Self {
            description: txn.description.clone(),
            amount: txn.amount.normalize().to_string(),
            kind: txn.kind,
        }
    }

    pub fn clear(&mut self, kind: TransactionType) {
        self.description.clear();
        self.amount.clear();
        self.kind = kind;
    }

    pub fn validate(&self) -> Result<ValidEntry, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let amount = parse_amount(&self.amount)?;
        Ok(ValidEntry {
            description: description.to_string(),
            amount,
            kind: self.kind,
        })
    }
}

/// Parse user-entered amount text. Accepts an optional leading `$` and
/// thousand separators, e.g. `"$1,234.50"`.
pub fn parse_amount(text: &str) -> Result<Decimal, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAmount);
    }
    let cleaned: String = trimmed
        .strip_prefix('$')
        .unwrap_or(trimmed)
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount = Decimal::from_str(cleaned.trim())
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::NegativeAmount);
    }
    Ok(amount.abs())
}
