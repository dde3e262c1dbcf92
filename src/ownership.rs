//! Ownership checks that scope every read and write to the caller's own records.
//!
//! Every check reports a failure as [Error::NotFound], whether the record
//! does not exist, belongs to someone else, or the caller's account is gone.
//! Callers therefore learn nothing about records they do not own.

use rusqlite::Connection;

use crate::{
    Error,
    auth::{Principal, User, get_user_by_email},
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction, TransactionDraft, get_transaction},
};

/// Look up the account of the caller.
///
/// # Errors
/// Returns [Error::NotFound] if no account is registered with the principal's
/// email, e.g. a token issued for an account that has since been deleted.
pub fn resolve_user(principal: &Principal, connection: &Connection) -> Result<User, Error> {
    get_user_by_email(&principal.email, connection)
}

/// Fetch the transaction `transaction_id` if it is owned by `user`.
///
/// # Errors
/// Returns [Error::NotFound] if the transaction does not exist or is owned by
/// another user.
pub fn authorize_read(
    user: &User,
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = get_transaction(transaction_id, connection)?;

    if transaction.user_id != user.id {
        tracing::debug!(
            "User {} tried to access transaction {} owned by user {}",
            user.id,
            transaction_id,
            transaction.user_id
        );
        return Err(Error::NotFound);
    }

    Ok(transaction)
}

/// Turn client input into a write owned by `user`.
///
/// Any owner supplied by the client is discarded.
pub fn authorize_write(user: &User, draft: TransactionDraft) -> NewTransaction {
    if let Some(claimed_owner) = draft.user_id.filter(|owner| *owner != user.id) {
        tracing::warn!(
            "User {} sent a transaction claiming owner {}, using {} instead",
            user.id,
            claimed_owner,
            user.id
        );
    }

    NewTransaction {
        title: draft.title,
        amount: draft.amount,
        transaction_type: draft.transaction_type,
        category: draft.category,
        date: draft.date,
        note: draft.note,
        user_id: user.id,
    }
}
