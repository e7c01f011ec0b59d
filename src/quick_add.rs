//! The home-screen quick-add path: open the shared file on its own, make sure
//! the schema matches, write one expense, close.

use std::path::Path;
use tracing::{info, warn};

use crate::db::{ConnectionPolicy, Database};
use crate::error::{Error, Result};
use crate::models::{timestamp_now, TransactionForm, TransactionType};

/// Validate and insert a single expense. Returns the new id.
pub fn record_expense(path: &Path, description: &str, amount: &str) -> Result<i64> {
    let entry = TransactionForm::new(description, amount, TransactionType::Expense).validate()?;

    let db = Database::open(path, ConnectionPolicy::PerCall);
    match db.ensure_schema() {
        Ok(_) => {}
        Err(Error::Migration(e)) => warn!("Quick add continuing without type column: {e}"),
        Err(e) => return Err(e),
    }

    let id = db.insert(
        &entry.description,
        entry.amount,
        &timestamp_now(),
        TransactionType::Expense,
    )?;
    info!("Quick add saved transaction {id}");
    Ok(id)
}
