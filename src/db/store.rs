//! SQL for the four record operations. Callers ensure the schema first.

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, Row};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::models::{Transaction, TransactionType};

const SELECT_ALL: &str = "SELECT id, description, amount, date, type
     FROM transactions
     ORDER BY id DESC";

// Used while the type column is missing; every row reads as an expense.
const SELECT_ALL_UNTYPED: &str = "SELECT id, description, amount, date, NULL
     FROM transactions
     ORDER BY id DESC";

pub(crate) fn insert(
    conn: &Connection,
    description: &str,
    amount: Decimal,
    date: &str,
    kind: TransactionType,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO transactions (description, amount, date, type) VALUES (?1, ?2, ?3, ?4)",
        params![description, to_real(amount), date, kind.as_str()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn list_all(
    conn: &Connection,
    has_type_column: bool,
) -> rusqlite::Result<Vec<Transaction>> {
    let sql = if has_type_column {
        SELECT_ALL
    } else {
        SELECT_ALL_UNTYPED
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_row)?;
    let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// Returns the number of rows touched; zero when `id` does not exist.
pub(crate) fn update(
    conn: &Connection,
    id: i64,
    description: &str,
    amount: Decimal,
    date: &str,
    kind: TransactionType,
) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE transactions SET description = ?1, amount = ?2, date = ?3, type = ?4 WHERE id = ?5",
        params![description, to_real(amount), date, kind.as_str(), id],
    )
}

pub(crate) fn delete(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM transactions WHERE id = ?1", params![id])
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let id: i64 = row.get(0)?;
    let description = read_text(row.get_ref(1)?);
    let amount = read_amount(row.get_ref(2)?).unwrap_or_else(|| {
        warn!("Transaction {id} has a non-numeric amount, reading it as 0");
        Decimal::ZERO
    });
    let date = read_text(row.get_ref(3)?);
    let kind: Option<String> = row.get(4)?;
    Ok(Transaction {
        id,
        description,
        amount,
        date,
        kind: TransactionType::from_column(kind.as_deref()),
    })
}

/// Text columns as written by any client: NULL reads as empty, bytes that
/// are not UTF-8 are replaced rather than failing the whole list.
pub(crate) fn read_text(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Coerce whatever the column holds into a magnitude. Other writers of the
/// file may have stored integers or text.
pub(crate) fn read_amount(value: ValueRef<'_>) -> Option<Decimal> {
    let amount = match value {
        ValueRef::Null => Some(Decimal::ZERO),
        ValueRef::Integer(i) => Some(Decimal::from(i)),
        // Shortest round-trip text first so 87.3 does not read back as 87.299999...
        ValueRef::Real(f) => Decimal::from_str(&f.to_string())
            .ok()
            .or_else(|| Decimal::from_f64(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| Decimal::from_str(s.trim()).ok()),
        ValueRef::Blob(_) => None,
    };
    amount.map(|a| a.abs().normalize())
}

fn to_real(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}
