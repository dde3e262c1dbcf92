use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Principal,
    database_id::TransactionId,
    ownership::{authorize_read, authorize_write, resolve_user},
    transaction::{Transaction, TransactionPatch, update_transaction},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for editing one of the caller's transactions.
///
/// The fields in the request body are applied on top of the stored
/// transaction and the result is checked again as a whole, so an edit that
/// only touches the note still has to have a valid category. Leaving a field
/// out keeps its stored value, and `"note": null` clears the note. The owner
/// cannot be changed.
///
/// Responds with 404 not found if the transaction does not exist or belongs
/// to another user.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    principal: Principal,
    Path(transaction_id): Path<TransactionId>,
    Json(patch): Json<TransactionPatch>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;
    let db_transaction = connection.unchecked_transaction()?;

    let user = resolve_user(&principal, &db_transaction)?;
    let stored = authorize_read(&user, transaction_id, &db_transaction)?;
    let changes = authorize_write(&user, patch.apply_to(stored));
    let updated = update_transaction(transaction_id, &changes, &db_transaction)?;

    db_transaction.commit()?;

    Ok(Json(updated))
}
