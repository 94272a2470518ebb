//! Error types for token handling and the session flow

use crate::core_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token issuer: expected {expected}, got {actual}")]
    WrongIssuer { expected: String, actual: String },

    #[error("Invalid token subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid token lifetime: {0}")]
    InvalidTtl(String),

    /// HMAC takes keys of any length, so signing never reports this; the
    /// `Mac` constructor is fallible only for other MAC types.
    #[error("Invalid signing key")]
    InvalidKey,

    #[error("Token encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Token has been revoked")]
    Revoked,
}

pub type AuthResult<T> = Result<T, AuthError>;
