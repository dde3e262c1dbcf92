//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the category rules every transaction must follow
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction API

mod category;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;

pub use category::{
    Category, EXPENSE_CATEGORIES, INCOME_CATEGORIES, TransactionType, UnknownLabel, validate,
};
pub use core::{
    NewTransaction, Transaction, create_transaction, create_transaction_table,
    delete_transaction, get_transaction, get_transactions_for_user, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::{TransactionDraft, TransactionPatch};
pub use get_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
