use rust_decimal::Decimal;

use crate::models::Transaction;

/// Dollars with thousand separators and cents, sign in front of the `$`:
/// `-1234.5` → `"-$1,234.50"`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let cents = format!("{:.2}", val.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let sign = if val.is_sign_negative() && !val.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}.{frac}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// List-row amount: `+$2,000.00` for income, `-$4.50` for expense.
pub(crate) fn format_signed(txn: &Transaction) -> String {
    let sign = if txn.is_income() { '+' } else { '-' };
    format!("{sign}{}", format_amount(txn.amount.abs()))
}

/// `2024-01-15T09:30:00.000Z` → `2024-01-15 09:30`. Anything unexpected is
/// shown as stored.
pub(crate) fn format_date(iso: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Clip to `max` characters, the last one being `…` when anything was cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some(_) if max == 0 => String::new(),
        Some(_) => {
            let keep: String = s.chars().take(max - 1).collect();
            format!("{keep}…")
        }
    }
}
