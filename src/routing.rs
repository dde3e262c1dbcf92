//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
};

use crate::{
    AppState,
    auth::{auth_gate, get_current_user, post_log_in, register_user},
    endpoints,
    error::json_error,
    report::{get_summary_endpoint, get_totals_by_category_endpoint},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route except registration and log-in goes through [auth_gate].
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(post_log_in));

    let protected_routes = Router::new()
        .route(endpoints::CURRENT_USER, get(get_current_user))
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::REPORT_SUMMARY, get(get_summary_endpoint))
        .route(
            endpoints::REPORT_BY_CATEGORY,
            get(get_totals_by_category_endpoint),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_gate));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

async fn get_404_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}
