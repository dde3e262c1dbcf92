//! The authenticated identity attached to a request.

use axum::{extract::FromRequestParts, http::request::Parts};
use email_address::EmailAddress;

use crate::Error;

/// The identity of the caller, established by [auth_gate](crate::auth::auth_gate)
/// from a verified bearer token.
///
/// A principal only says who the caller is. Whether the caller may access a
/// particular record is decided per resource by the
/// [ownership](crate::ownership) checks.
///
/// Handlers take a `Principal` argument to require authentication. If the
/// request did not carry a bearer token the extractor rejects with
/// [Error::Unauthenticated].
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    /// The email the token was issued for.
    pub email: EmailAddress,
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(Error::Unauthenticated)
    }
}
