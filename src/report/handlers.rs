//! Report HTTP handlers.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::Principal,
    ownership::resolve_user,
    report::{ReportRow, Summary, get_report_rows_for_user, summarize, totals_by_category},
};

/// The state needed for building reports.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn get_rows_for_principal(
    state: &ReportState,
    principal: &Principal,
) -> Result<Vec<ReportRow>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user = resolve_user(principal, &connection)?;
    get_report_rows_for_user(user.id, &connection)
}

/// A route handler for the caller's income, expense and net balance totals.
pub async fn get_summary_endpoint(
    State(state): State<ReportState>,
    principal: Principal,
) -> Result<Json<Summary>, Error> {
    let rows = get_rows_for_principal(&state, &principal)?;

    Ok(Json(summarize(&rows)))
}

/// A route handler for the caller's totals per category label.
pub async fn get_totals_by_category_endpoint(
    State(state): State<ReportState>,
    principal: Principal,
) -> Result<Json<HashMap<String, f64>>, Error> {
    let rows = get_rows_for_principal(&state, &principal)?;

    Ok(Json(totals_by_category(&rows)))
}
