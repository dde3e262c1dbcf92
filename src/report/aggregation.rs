//! Transaction data aggregation for reports.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{report::ReportRow, transaction::TransactionType};

/// The income, expense and net balance totals over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expense: f64,
    /// `income - expense`.
    pub net_balance: f64,
}

/// Sums income and expense amounts.
///
/// Rows with an unknown transaction type are skipped.
pub fn summarize(rows: &[ReportRow]) -> Summary {
    let mut income = 0.0;
    let mut expense = 0.0;

    for row in rows {
        match row.transaction_type {
            Some(TransactionType::Income) => income += row.amount,
            Some(TransactionType::Expense) => expense += row.amount,
            None => {
                tracing::warn!(
                    "Skipping transaction with unknown type in category {}",
                    row.category
                );
            }
        }
    }

    Summary {
        income,
        expense,
        net_balance: income - expense,
    }
}

/// Sums amounts by category label, regardless of transaction type.
///
/// # Returns
/// HashMap mapping each category label that appears in `rows` to its total.
pub fn totals_by_category(rows: &[ReportRow]) -> HashMap<String, f64> {
    let mut totals = HashMap::new();

    for row in rows {
        *totals.entry(row.category.clone()).or_insert(0.0) += row.amount;
    }

    totals
}
