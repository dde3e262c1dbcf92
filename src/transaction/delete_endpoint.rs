use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::Principal,
    database_id::TransactionId,
    ownership::{authorize_read, resolve_user},
    transaction::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting one of the caller's transactions.
///
/// Responds with 404 not found if the transaction does not exist or belongs
/// to another user.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    principal: Principal,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;
    let db_transaction = connection.unchecked_transaction()?;

    let user = resolve_user(&principal, &db_transaction)?;
    authorize_read(&user, transaction_id, &db_transaction)?;

    match delete_transaction(transaction_id, user.id, &db_transaction)? {
        0 => {
            tracing::error!(
                "Could not delete transaction {transaction_id}: delete returned zero rows affected"
            );
            return Err(Error::NotFound);
        }
        _ => db_transaction.commit()?,
    }

    Ok(Json(json!({ "message": "Transaction deleted" })))
}
