//! This file defines the route for handling log-in requests.
//! The token module handles the lower level signing and verification of bearer tokens.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use email_address::EmailAddress;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{TokenCodec, User, get_user_by_email},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// Signs the tokens handed out on a successful log-in.
    pub token_codec: TokenCodec,
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_codec: state.token_codec.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data entered by the user to log in.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password hash in the database.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInForm {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// The body of a successful log-in response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// A bearer token whose subject is the user's email.
    pub token: String,
}

/// Handler for log-in requests.
///
/// On a successful log-in request a signed bearer token is returned.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
pub async fn post_log_in(
    State(state): State<LogInState>,
    Json(form): Json<LogInForm>,
) -> Result<Json<TokenResponse>, Error> {
    let email = EmailAddress::from_str(&form.email).map_err(|_| Error::UserNotRegistered)?;

    let user: User = {
        let connection = state.db_connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::UserNotRegistered),
            Err(error) => return Err(error),
        }
    };

    let is_password_valid = user.password_hash.verify(&form.password).map_err(|error| {
        tracing::error!("Unhandled error while verifying credentials: {error}");
        Error::HashingError(error.to_string())
    })?;

    if !is_password_valid {
        tracing::debug!("Rejected log-in for user {}: incorrect password", user.id);
        return Err(Error::InvalidCredentials);
    }

    let token = state
        .token_codec
        .issue(user.email.as_str())
        .map_err(|error| Error::TokenCreation(error.to_string()))?;

    Ok(Json(TokenResponse { token }))
}
