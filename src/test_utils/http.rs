use axum_test::TestServer;
use serde_json::{Value, json};

use crate::{
    AppState, build_router,
    endpoints::{LOG_IN, REGISTER, TRANSACTIONS},
    test_utils::{TEST_PASSWORD, get_test_state},
    transaction::Transaction,
};

/// A test server running the full application router.
pub(crate) fn get_test_server() -> (TestServer, AppState) {
    let state = get_test_state();
    let app = build_router(state.clone());

    (
        TestServer::new(app),
        state,
    )
}

/// Log in as `{name}@example.com` and return the bearer token.
pub(crate) async fn log_in_as(server: &TestServer, name: &str) -> String {
    let response = server
        .post(LOG_IN)
        .json(&json!({
            "email": format!("{name}@example.com"),
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status_ok();

    response.json::<Value>()["token"]
        .as_str()
        .expect("log in response has no token")
        .to_owned()
}

/// Register `{name}@example.com` with the username `name` and return a bearer token.
pub(crate) async fn register_and_log_in(server: &TestServer, name: &str) -> String {
    server
        .post(REGISTER)
        .json(&json!({
            "username": name,
            "email": format!("{name}@example.com"),
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    log_in_as(server, name).await
}

/// Create a transaction through the API as the holder of `token`.
pub(crate) async fn create_transaction_for(
    server: &TestServer,
    token: &str,
    body: Value,
) -> Transaction {
    let response = server
        .post(TRANSACTIONS)
        .authorization_bearer(token)
        .json(&body)
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    response.json::<Transaction>()
}
