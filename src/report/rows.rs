//! Database queries for retrieving report data.
//!
//! This module provides a simplified transaction view for aggregation,
//! containing only the fields needed for totals (amount, type, category).

use std::str::FromStr;

use rusqlite::Connection;

use crate::{Error, auth::UserID, transaction::TransactionType};

/// A simplified transaction view for report aggregations.
///
/// The type and category are read as raw text so that a row with a corrupt
/// value is skipped by the aggregation instead of failing the whole report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// The transaction amount.
    pub amount: f64,
    /// The transaction type, or `None` if the stored text is not a known type.
    pub transaction_type: Option<TransactionType>,
    /// The category label as stored.
    pub category: String,
}

/// Gets the amount, type and category of every transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
pub fn get_report_rows_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<ReportRow>, Error> {
    let mut stmt = connection
        .prepare("SELECT amount, type, category FROM \"transaction\" WHERE user_id = :user_id")?;

    stmt.query_map(&[(":user_id", &user_id.as_i64())], |row| {
        let raw_type: String = row.get(1)?;

        Ok(ReportRow {
            amount: row.get(0)?,
            transaction_type: TransactionType::from_str(&raw_type).ok(),
            category: row.get(2)?,
        })
    })?
    .collect::<Result<Vec<ReportRow>, rusqlite::Error>>()
    .map_err(|error| error.into())
}
