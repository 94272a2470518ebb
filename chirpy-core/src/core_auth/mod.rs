/*
    core_auth - Bearer tokens for the chirp service

    Signing/verification of access and refresh tokens, and the session
    flow that combines them with the store's revocation bookkeeping.
*/

pub mod authenticator;
pub mod error;
pub mod token;

pub use authenticator::{Authenticator, Session, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL};
pub use error::{AuthError, AuthResult, TokenError};
pub use token::{Claims, TokenPair, TokenPurpose, TokenSigner, DEFAULT_TOKEN_TTL};
