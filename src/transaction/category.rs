//! Transaction types, categories and the rule that binds them together.
//!
//! Every category belongs to exactly one of [EXPENSE_CATEGORIES] or
//! [INCOME_CATEGORIES], and a transaction may only use a category from the
//! set matching its [TransactionType].

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money was earned.
    Income,
    /// Money was spent.
    Expense,
}

impl TransactionType {
    /// The label used for the type in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(UnknownLabel(other.to_owned())),
        }
    }
}

/// What a transaction was for.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Groceries,
    Rent,
    Utilities,
    Travel,
    Health,
    Entertainment,
    Education,
    Subscriptions,
    /// Catch-all for expenses.
    OtherExpense,
    Salary,
    Freelance,
    Business,
    Investment,
    Gifts,
    /// Catch-all for income.
    OtherIncome,
}

/// The categories that may be used for [TransactionType::Expense].
pub const EXPENSE_CATEGORIES: [Category; 10] = [
    Category::Food,
    Category::Groceries,
    Category::Rent,
    Category::Utilities,
    Category::Travel,
    Category::Health,
    Category::Entertainment,
    Category::Education,
    Category::Subscriptions,
    Category::OtherExpense,
];

/// The categories that may be used for [TransactionType::Income].
pub const INCOME_CATEGORIES: [Category; 6] = [
    Category::Salary,
    Category::Freelance,
    Category::Business,
    Category::Investment,
    Category::Gifts,
    Category::OtherIncome,
];

impl Category {
    /// The label used for the category in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "FOOD",
            Category::Groceries => "GROCERIES",
            Category::Rent => "RENT",
            Category::Utilities => "UTILITIES",
            Category::Travel => "TRAVEL",
            Category::Health => "HEALTH",
            Category::Entertainment => "ENTERTAINMENT",
            Category::Education => "EDUCATION",
            Category::Subscriptions => "SUBSCRIPTIONS",
            Category::OtherExpense => "OTHER_EXPENSE",
            Category::Salary => "SALARY",
            Category::Freelance => "FREELANCE",
            Category::Business => "BUSINESS",
            Category::Investment => "INVESTMENT",
            Category::Gifts => "GIFTS",
            Category::OtherIncome => "OTHER_INCOME",
        }
    }

    /// The transaction type this category may be used with.
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Category::Food
            | Category::Groceries
            | Category::Rent
            | Category::Utilities
            | Category::Travel
            | Category::Health
            | Category::Entertainment
            | Category::Education
            | Category::Subscriptions
            | Category::OtherExpense => TransactionType::Expense,
            Category::Salary
            | Category::Freelance
            | Category::Business
            | Category::Investment
            | Category::Gifts
            | Category::OtherIncome => TransactionType::Income,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EXPENSE_CATEGORIES
            .iter()
            .chain(INCOME_CATEGORIES.iter())
            .find(|category| category.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownLabel(s.to_owned()))
    }
}

/// A string that does not name a transaction type or category.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown label \"{0}\"")]
pub struct UnknownLabel(pub String);

/// Check that `category` may be used with `transaction_type`.
///
/// # Errors
/// Returns [Error::InvalidCategoryForType] naming the category if it belongs
/// to the other transaction type.
pub fn validate(transaction_type: TransactionType, category: Category) -> Result<(), Error> {
    let allowed: &[Category] = match transaction_type {
        TransactionType::Expense => &EXPENSE_CATEGORIES,
        TransactionType::Income => &INCOME_CATEGORIES,
    };

    if allowed.contains(&category) {
        Ok(())
    } else {
        Err(Error::InvalidCategoryForType {
            transaction_type,
            category,
        })
    }
}
