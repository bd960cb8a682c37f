use std::io::Write;

use crate::domain::transaction::{Transaction, DATE_FORMAT};

#[derive(serde::Serialize)]
/// One journal output row per transaction line.
///
/// Headers written (in this order): `date,account_id,account,debit,credit,comment`.
/// Monetary fields are formatted to 4 decimal places as strings.
struct JournalRow<'r> {
    date: &'r str,
    account_id: &'r str,
    account: &'r str,
    debit: String,
    credit: String,
    comment: &'r str,
}

/// Writes a posted transaction as journal rows to a CSV writer.
///
/// Lines come out in [`Transaction::account_line_entries`] order: debits
/// first, each side largest value first. Returns the number of rows written.
///
/// # Errors
///
/// Returns a `csv::Error` if writing/serializing any row fails.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use double_entry::common::money::Money;
/// use double_entry::domain::account::{AccountType, BasicAccount};
/// use double_entry::domain::line::TransactionLine;
/// use double_entry::domain::transaction::Transaction;
/// use double_entry::io::journal::write_entry;
///
/// let stock = BasicAccount::new(1u64, "Stock", AccountType::Asset);
/// let cash = BasicAccount::new(2u64, "Cash", AccountType::Asset);
/// let tx = Transaction::new(
///     Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
///     "stock",
///     [
///         TransactionLine::debit(&stock, Money::from_units(15)).unwrap(),
///         TransactionLine::credit(&cash, Money::from_units(15)).unwrap(),
///     ],
/// )
/// .unwrap();
///
/// let mut out = Vec::new();
/// write_entry(&mut out, &tx).unwrap();
///
/// let s = String::from_utf8(out).unwrap();
/// assert!(s.starts_with("date,account_id,account,debit,credit,comment\n"));
/// assert!(s.contains("\n2024-01-02 03:04:05,1,Stock,15.0000,0.0000,stock\n"));
/// ```
pub fn write_entry<W: Write>(writer: W, transaction: &Transaction<'_>) -> Result<usize, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    let date = transaction.date().format(DATE_FORMAT).to_string();
    let mut rows = 0;
    for line in transaction.account_line_entries() {
        let account_id = line.account_id();
        let row = JournalRow {
            date: &date,
            account_id: account_id.as_str(),
            account: line.account().name(),
            debit: line.debit_amount().to_string_4dp(),
            credit: line.credit_amount().to_string_4dp(),
            comment: line.comment(),
        };
        wtr.serialize(row)?;
        rows += 1;
    }

    wtr.flush()?;
    Ok(rows)
}
