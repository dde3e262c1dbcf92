//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::transaction::{Category, TransactionType};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an incorrect password for a registered email.
    #[error("Invalid User")]
    InvalidCredentials,

    /// The email used to log in does not belong to a registered user.
    #[error("User not Registered")]
    UserNotRegistered,

    /// A handler that requires a principal was reached without a bearer token.
    #[error("missing credentials")]
    Unauthenticated,

    /// The email address used to register is already taken.
    #[error("Email Already Exists")]
    DuplicateEmail,

    /// The username used to register is already taken.
    #[error("Username Already Exists")]
    DuplicateUsername,

    /// The string could not be parsed as an email address.
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The category of a transaction does not belong to the categories for
    /// its transaction type, e.g. an expense filed under `SALARY`.
    #[error("Invalid category for {transaction_type}: {category}")]
    InvalidCategoryForType {
        /// The declared type of the transaction.
        transaction_type: TransactionType,
        /// The offending category.
        category: Category,
    },

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The token for a logged in user could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The requested resource was not found.
    ///
    /// This is also returned when the resource exists but belongs to another
    /// user, or when the caller's account no longer exists, so that clients
    /// cannot tell these cases apart.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("not found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.username") =>
            {
                Error::DuplicateUsername
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match &self {
            Error::InvalidCredentials | Error::UserNotRegistered | Error::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            Error::DuplicateEmail | Error::DuplicateUsername => StatusCode::CONFLICT,
            Error::InvalidEmail(_) | Error::InvalidCategoryForType { .. } => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound => StatusCode::NOT_FOUND,
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error");
            }
        };

        json_error(status_code, &self.to_string())
    }
}

/// Create a response with `status_code` and the body `{"error": message}`.
pub fn json_error(status_code: StatusCode, message: &str) -> Response {
    (status_code, Json(json!({ "error": message }))).into_response()
}
