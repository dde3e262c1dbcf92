use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Principal,
    ownership::{authorize_write, resolve_user},
    transaction::{Transaction, TransactionDraft, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction owned by the caller.
///
/// Responds with 201 and the created transaction.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    principal: Principal,
    Json(draft): Json<TransactionDraft>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;
    let db_transaction = connection.unchecked_transaction()?;

    let user = resolve_user(&principal, &db_transaction)?;
    let transaction = create_transaction(authorize_write(&user, draft), &db_transaction)?;

    db_transaction.commit()?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
