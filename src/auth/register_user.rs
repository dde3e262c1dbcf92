//! The endpoint for registering a new user.
use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    auth::{PasswordHash, create_user},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The bcrypt cost used to hash the new user's password.
    pub password_hash_cost: u32,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_hash_cost: state.password_hash_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data sent by a client to register a new user.
#[derive(Clone, Deserialize)]
pub struct RegisterForm {
    /// The display name, must not already be taken.
    pub username: String,
    /// The email address the user will log in with.
    pub email: String,
    /// The plaintext password. Only the bcrypt hash of it is stored.
    pub password: String,
}

/// A route handler for creating a new user.
///
/// Responds with 201 `{"message": "Successfully Registered"}`, 409 if the email
/// or username is taken, or 400 if the email address is invalid.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let email =
        EmailAddress::from_str(&form.email).map_err(|error| Error::InvalidEmail(error.to_string()))?;
    let password_hash = PasswordHash::from_raw_password(&form.password, state.password_hash_cost)?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("Could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let user = create_user(&form.username, email, password_hash, &connection)?;
    tracing::info!("Registered user {} with ID {}", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Successfully Registered" })),
    ))
}
