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
    ownership::{authorize_read, resolve_user},
    transaction::{Transaction, get_transactions_for_user},
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct GetTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for listing the caller's transactions.
///
/// The query is filtered by the caller's user ID, so other users' rows are
/// never loaded.
pub async fn get_transactions_endpoint(
    State(state): State<GetTransactionState>,
    principal: Principal,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user = resolve_user(&principal, &connection)?;
    let transactions = get_transactions_for_user(user.id, &connection)?;

    Ok(Json(transactions))
}

/// A route handler for getting one of the caller's transactions.
///
/// Responds with 404 not found if the transaction belongs to another user so
/// that callers cannot know whether another user's transaction exists.
pub async fn get_transaction_endpoint(
    State(state): State<GetTransactionState>,
    principal: Principal,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user = resolve_user(&principal, &connection)?;
    let transaction = authorize_read(&user, transaction_id, &connection)?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod get_transaction_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{create_transaction_for, get_test_server, register_and_log_in},
        transaction::Transaction,
    };

    fn lunch() -> Value {
        json!({
            "title": "Lunch",
            "amount": 12.5,
            "type": "EXPENSE",
            "category": "FOOD",
            "date": "2025-10-26"
        })
    }

    #[tokio::test]
    async fn get_transaction_succeeds_for_owner() {
        let (server, _) = get_test_server();
        let token = register_and_log_in(&server, "alice").await;
        let created = create_transaction_for(&server, &token, lunch()).await;

        let response = server
            .get(&format_endpoint(endpoints::TRANSACTION, created.id))
            .authorization_bearer(&token)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Transaction>(), created);
    }

    #[tokio::test]
    async fn get_transaction_fails_on_wrong_user() {
        let (server, _) = get_test_server();
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        let alices = create_transaction_for(&server, &alice, lunch()).await;

        let foreign = server
            .get(&format_endpoint(endpoints::TRANSACTION, alices.id))
            .authorization_bearer(&bob)
            .await;
        let missing = server
            .get(&format_endpoint(endpoints::TRANSACTION, alices.id + 1000))
            .authorization_bearer(&bob)
            .await;

        foreign.assert_status(StatusCode::NOT_FOUND);
        missing.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(foreign.text(), missing.text());
    }

    #[tokio::test]
    async fn list_only_contains_own_transactions() {
        let (server, _) = get_test_server();
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;
        let alices = create_transaction_for(&server, &alice, lunch()).await;
        create_transaction_for(&server, &bob, lunch()).await;

        let response = server
            .get(endpoints::TRANSACTIONS)
            .authorization_bearer(&alice)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Vec<Transaction>>(), vec![alices]);
    }

    #[tokio::test]
    async fn concurrent_lists_never_mix_users() {
        let (server, _) = get_test_server();
        let alice = register_and_log_in(&server, "alice").await;
        let bob = register_and_log_in(&server, "bob").await;

        for _ in 0..5 {
            create_transaction_for(&server, &alice, lunch()).await;
            create_transaction_for(&server, &bob, lunch()).await;
        }

        let alice_id = server
            .get(endpoints::CURRENT_USER)
            .authorization_bearer(&alice)
            .await
            .json::<Value>()["id"]
            .clone();
        let bob_id = server
            .get(endpoints::CURRENT_USER)
            .authorization_bearer(&bob)
            .await
            .json::<Value>()["id"]
            .clone();

        for _ in 0..10 {
            let (alices, bobs) = tokio::join!(
                async {
                    server
                        .get(endpoints::TRANSACTIONS)
                        .authorization_bearer(&alice)
                        .await
                },
                async {
                    server
                        .get(endpoints::TRANSACTIONS)
                        .authorization_bearer(&bob)
                        .await
                },
            );

            let alices = alices.json::<Vec<Value>>();
            let bobs = bobs.json::<Vec<Value>>();

            assert_eq!(alices.len(), 5);
            assert_eq!(bobs.len(), 5);
            assert!(alices.iter().all(|t| t["user_id"] == alice_id));
            assert!(bobs.iter().all(|t| t["user_id"] == bob_id));
        }
    }

    #[tokio::test]
    async fn list_without_token_is_unauthorized() {
        let (server, _) = get_test_server();

        server
            .get(endpoints::TRANSACTIONS)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
