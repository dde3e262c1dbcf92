//! Signed, time-bounded identity tokens.
//!
//! Tokens are JSON Web Tokens signed with HS512. The signing key is derived
//! from the server secret once at startup and never changes afterwards, so a
//! [TokenCodec] can be cloned freely and used from any task without locking.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use time::{Duration, OffsetDateTime};

/// How long a token is valid for if the server is not configured otherwise.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::hours(1);

/// The longest lifetime a token may be configured with.
pub const MAX_TOKEN_TTL: Duration = Duration::days(365);

/// The contents of a token.
///
/// Timestamps are Unix timestamps in whole seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The email of the user the token was issued to.
    pub sub: String,
    /// When the token was issued.
    pub iat: i64,
    /// When the token stops being valid.
    pub exp: i64,
}

/// The reasons a token can fail verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token could not be parsed, or is missing required claims.
    #[error("malformed token")]
    Malformed,

    /// The token was not signed with this server's key.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token's expiry time has passed.
    #[error("token expired")]
    Expired,
}

/// The reasons a token could not be issued.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    /// Adding the TTL to the issue time overflows the supported date range.
    #[error("token expiry is out of range for a lifetime of {0}")]
    ExpiryOutOfRange(Duration),

    /// The claims could not be encoded or signed.
    #[error("could not sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with a key derived from the server secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Create a codec that signs tokens with a key derived from `secret`,
    /// valid for `ttl` after they are issued.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let key = Sha512::digest(secret);

        Self {
            encoding_key: EncodingKey::from_secret(&key),
            decoding_key: DecodingKey::from_secret(&key),
            ttl,
        }
    }

    /// Issue a token for `subject` that is valid from now until now + TTL.
    ///
    /// # Errors
    /// Returns an error if the expiry time is out of range or the token could
    /// not be signed.
    pub fn issue(&self, subject: &str) -> Result<String, IssueError> {
        self.issue_at(subject, OffsetDateTime::now_utc())
    }

    /// Issue a token for `subject` as if the current time was `now`.
    ///
    /// # Errors
    /// Returns an error if the expiry time is out of range or the token could
    /// not be signed.
    pub fn issue_at(&self, subject: &str, now: OffsetDateTime) -> Result<String, IssueError> {
        let expires_at = now
            .checked_add(self.ttl)
            .ok_or(IssueError::ExpiryOutOfRange(self.ttl))?;

        let claims = Claims {
            sub: subject.to_owned(),
            iat: now.unix_timestamp(),
            exp: expires_at.unix_timestamp(),
        };

        Ok(encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Verify `token` and return the subject it was issued for.
    ///
    /// # Errors
    /// Returns a [TokenError] describing why the token was rejected.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, OffsetDateTime::now_utc())
    }

    /// Verify `token` as if the current time was `now`.
    ///
    /// The signature is checked before the expiry, so a forged token is
    /// reported as [TokenError::InvalidSignature] even when it has also
    /// expired. A token is expired once `now` reaches its expiry time.
    ///
    /// # Errors
    /// Returns a [TokenError] describing why the token was rejected.
    pub fn verify_at(&self, token: &str, now: OffsetDateTime) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is checked below against `now` so that one clock reading is
        // used for the whole verification.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|error| match error.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?
            .claims;

        let expires_at =
            OffsetDateTime::from_unix_timestamp(claims.exp).map_err(|_| TokenError::Malformed)?;

        if now >= expires_at {
            return Err(TokenError::Expired);
        }

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod token_codec_tests {
    use time::{Duration, macros::datetime};

    use crate::auth::token::{IssueError, MAX_TOKEN_TTL, TokenCodec, TokenError};

    const SUBJECT: &str = "alice@example.com";

    fn get_codec(ttl: Duration) -> TokenCodec {
        TokenCodec::new("averysecretsecret", ttl)
    }

    #[test]
    fn verify_returns_issued_subject() {
        let codec = get_codec(Duration::hours(1));
        let token = codec.issue(SUBJECT).unwrap();

        assert_eq!(codec.verify(&token), Ok(SUBJECT.to_owned()));
    }

    #[test]
    fn token_is_valid_before_expiry_and_expired_after() {
        let codec = get_codec(Duration::seconds(1));
        let issued_at = datetime!(2025-06-01 12:00:00 UTC);
        let token = codec.issue_at(SUBJECT, issued_at).unwrap();

        assert_eq!(
            codec.verify_at(&token, issued_at + Duration::milliseconds(500)),
            Ok(SUBJECT.to_owned())
        );
        assert_eq!(
            codec.verify_at(&token, issued_at + Duration::seconds(1)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            codec.verify_at(&token, issued_at + Duration::milliseconds(1500)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn token_from_other_key_has_invalid_signature() {
        let codec = get_codec(Duration::hours(1));
        let other_codec = TokenCodec::new("adifferentsecret", Duration::hours(1));
        let token = other_codec.issue(SUBJECT).unwrap();

        assert_eq!(codec.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn expired_token_from_other_key_has_invalid_signature() {
        let codec = get_codec(Duration::seconds(1));
        let other_codec = TokenCodec::new("adifferentsecret", Duration::seconds(1));
        let issued_at = datetime!(2025-06-01 12:00:00 UTC);
        let token = other_codec.issue_at(SUBJECT, issued_at).unwrap();

        assert_eq!(
            codec.verify_at(&token, issued_at + Duration::hours(1)),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn tampered_token_has_invalid_signature() {
        let codec = get_codec(Duration::hours(1));
        let token = codec.issue(SUBJECT).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_payload = codec.issue("mallory@example.com").unwrap();
        let forged_claims = forged_payload.split('.').nth(1).unwrap();
        parts[1] = forged_claims;
        let tampered = parts.join(".");

        assert_eq!(codec.verify(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn issue_with_out_of_range_ttl_is_an_error() {
        let codec = get_codec(Duration::seconds(1_000_000_000_000));

        assert!(matches!(
            codec.issue(SUBJECT),
            Err(IssueError::ExpiryOutOfRange(_))
        ));
    }

    #[test]
    fn max_ttl_can_be_issued() {
        let codec = get_codec(MAX_TOKEN_TTL);
        let issued_at = datetime!(2025-06-01 12:00:00 UTC);
        let token = codec.issue_at(SUBJECT, issued_at).unwrap();

        assert_eq!(
            codec.verify_at(&token, issued_at + Duration::days(364)),
            Ok(SUBJECT.to_owned())
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = get_codec(Duration::hours(1));

        assert_eq!(codec.verify("FOOBAR"), Err(TokenError::Malformed));
        assert_eq!(codec.verify(""), Err(TokenError::Malformed));
        assert_eq!(codec.verify("a.b.c"), Err(TokenError::Malformed));
    }
}
