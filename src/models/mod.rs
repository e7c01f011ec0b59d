mod form;
mod totals;
mod transaction;
mod transaction_type;

pub use form::{parse_amount, TransactionForm, ValidEntry};
pub use totals::Totals;
pub use transaction::{timestamp_now, Transaction};
pub use transaction_type::TransactionType;
