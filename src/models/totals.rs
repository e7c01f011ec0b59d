use rust_decimal::Decimal;

use super::{Transaction, TransactionType};

/// Income, expense and balance derived from a record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

impl Totals {
    pub fn from_records(records: &[Transaction]) -> Self {
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for txn in records {
            match txn.kind {
                TransactionType::Income => income += txn.amount,
                TransactionType::Expense => expense += txn.amount,
            }
        }
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}
