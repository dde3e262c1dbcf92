//! Defines the core data models and database queries for transactions.

use std::str::FromStr;

use rusqlite::{Connection, Row, params, types::Type};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    auth::UserID,
    database_id::{DatabaseId, TransactionId},
    transaction::category::{Category, TransactionType, validate},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: DatabaseId,
    /// A short name for the transaction.
    pub title: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// The sign is not used, [Transaction::transaction_type] says whether the
    /// money was spent or earned.
    pub amount: f64,
    /// Whether money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Optional free text about the transaction.
    pub note: Option<String>,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
}

/// The fields for a new or updated transaction with the owner already decided.
///
/// Use [authorize_write](crate::ownership::authorize_write) to create one from
/// client input so that the owner is always the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// A short name for the transaction.
    pub title: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// Whether money was spent or earned.
    pub transaction_type: TransactionType,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// Optional free text about the transaction.
    pub note: Option<String>,
    /// The ID of the user that owns the transaction.
    pub user_id: UserID,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                note TEXT,
                user_id INTEGER NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id)",
        (),
    )?;

    Ok(())
}

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategoryForType] if the category does not match the transaction type,
/// - [Error::NotFound] if the owner does not refer to a registered user,
/// - [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(transaction.transaction_type, transaction.category)?;

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (title, amount, type, category, date, note, user_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, title, amount, type, category, date, note, user_id",
        )?
        .query_row(
            params![
                transaction.title,
                transaction.amount,
                transaction.transaction_type.as_str(),
                transaction.category.as_str(),
                transaction.date,
                transaction.note,
                transaction.user_id.as_i64(),
            ],
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::NotFound,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// This does not check who owns the transaction, use
/// [authorize_read](crate::ownership::authorize_read) in request handlers.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, title, amount, type, category, date, note, user_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions owned by `user_id`, oldest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, title, amount, type, category, date, note, user_id
             FROM \"transaction\" WHERE user_id = :user_id
             ORDER BY date ASC, id ASC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Overwrite the transaction `id` owned by `transaction.user_id` with `transaction`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategoryForType] if the category does not match the transaction type,
/// - [Error::NotFound] if `id` does not refer to a transaction owned by `transaction.user_id`,
/// - [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    transaction: &NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    validate(transaction.transaction_type, transaction.category)?;

    let transaction = connection
        .prepare(
            "UPDATE \"transaction\"
             SET title = ?1, amount = ?2, type = ?3, category = ?4, date = ?5, note = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING id, title, amount, type, category, date, note, user_id",
        )?
        .query_one(
            params![
                transaction.title,
                transaction.amount,
                transaction.transaction_type.as_str(),
                transaction.category.as_str(),
                transaction.date,
                transaction.note,
                id,
                transaction.user_id.as_i64(),
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

type RowsAffected = usize;

/// Delete the transaction `id` if it is owned by `user_id`.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id), (":user_id", &user_id.as_i64())],
        )
        .map_err(|err| err.into())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_type: String = row.get(3)?;
    let raw_category: String = row.get(4)?;

    let transaction_type = TransactionType::from_str(&raw_type)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(error)))?;
    let category = Category::from_str(&raw_category)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(error)))?;

    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        transaction_type,
        category,
        date: row.get(5)?,
        note: row.get(6)?,
        user_id: UserID::new(row.get(7)?),
    })
}
