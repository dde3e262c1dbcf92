//! Authentication middleware that turns a bearer token into a [Principal].

use std::str::FromStr;

use axum::{
    RequestPartsExt,
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use email_address::EmailAddress;

use crate::{
    AppState,
    auth::{Principal, TokenCodec, TokenError},
    error::json_error,
};

/// The state needed for the auth middleware
#[derive(Debug, Clone)]
pub struct AuthState {
    /// Verifies the tokens in request headers.
    pub token_codec: TokenCodec,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            token_codec: state.token_codec.clone(),
        }
    }
}

/// Middleware function that checks the `Authorization: Bearer <token>` header.
///
/// - If there is no bearer token the request continues without a principal,
///   and handlers that take a [Principal] reject it themselves.
/// - If the token has expired the request is answered with 401 "token expired".
/// - If the token is malformed, signed with another key, or its subject is not
///   an email address, the request is answered with 401 "invalid token".
/// - Otherwise a [Principal] is placed into the request extensions and the
///   request is executed normally.
///
/// **Note**: Route handlers can use the function argument `principal: Principal` to receive the principal.
pub async fn auth_gate(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let (mut parts, body) = request.into_parts();

    let bearer = match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) => bearer,
        Err(_) => return next.run(Request::from_parts(parts, body)).await,
    };

    let subject = match state.token_codec.verify(bearer.token()) {
        Ok(subject) => subject,
        Err(TokenError::Expired) => {
            tracing::debug!("Rejected expired token for {}", parts.uri);
            return json_error(StatusCode::UNAUTHORIZED, "token expired");
        }
        Err(error) => {
            tracing::warn!("Rejected token for {}: {error}", parts.uri);
            return json_error(StatusCode::UNAUTHORIZED, "invalid token");
        }
    };

    let email = match EmailAddress::from_str(&subject) {
        Ok(email) => email,
        Err(error) => {
            tracing::warn!("Rejected token with subject \"{subject}\": {error}");
            return json_error(StatusCode::UNAUTHORIZED, "invalid token");
        }
    };

    parts.extensions.insert(Principal { email });
    let request = Request::from_parts(parts, body);

    next.run(request).await
}
