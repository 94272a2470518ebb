//! Login, refresh and revocation on top of the store
//!
//! The store answers "who is this?" and "was this revoked?"; the signer
//! answers "is this token genuine and current?". This type wires the two
//! together the way request handlers need them.

use crate::core_auth::error::{AuthError, AuthResult};
use crate::core_auth::token::{TokenPair, TokenPurpose, TokenSigner};
use crate::core_store::{Store, UserId, UserView};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Default access token lifetime
pub const DEFAULT_ACCESS_TTL: Duration = Duration::from_secs(60 * 60);

/// Default refresh token lifetime
pub const DEFAULT_REFRESH_TTL: Duration = Duration::from_secs(60 * 24 * 60 * 60);

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(flatten)]
    pub user: UserView,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

pub struct Authenticator {
    store: Arc<Store>,
    signer: TokenSigner,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Authenticator {
    pub fn new(store: Arc<Store>, signer: TokenSigner) -> Self {
        Authenticator {
            store,
            signer,
            access_ttl: DEFAULT_ACCESS_TTL,
            refresh_ttl: DEFAULT_REFRESH_TTL,
        }
    }

    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Check credentials and hand out a fresh token pair
    pub fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let user = self.store.login(email, password)?;
        let tokens = self.signer.issue_pair(user.id, self.access_ttl, self.refresh_ttl)?;

        info!(user_id = %user.id, "User logged in");
        Ok(Session { user, tokens })
    }

    /// Exchange a live refresh token for a new access token
    pub fn refresh(&self, refresh_token: &str) -> AuthResult<String> {
        let claims = self.signer.validate(refresh_token, TokenPurpose::Refresh)?;
        if self.store.is_revoked(refresh_token)? {
            warn!(sub = %claims.sub, "Refresh with revoked token");
            return Err(AuthError::Revoked);
        }

        let subject = claims.subject_id()?;
        Ok(self.signer.issue(subject, TokenPurpose::Access, self.access_ttl)?)
    }

    /// Revoke a refresh token. Only genuine refresh tokens are recorded.
    pub fn revoke(&self, refresh_token: &str) -> AuthResult<()> {
        let claims = self.signer.validate(refresh_token, TokenPurpose::Refresh)?;
        self.store.revoke(refresh_token)?;

        info!(sub = %claims.sub, "Refresh token revoked");
        Ok(())
    }

    /// Identify the bearer of an access token
    pub fn authenticate(&self, access_token: &str) -> AuthResult<UserId> {
        let claims = self.signer.validate(access_token, TokenPurpose::Access)?;
        Ok(claims.subject_id()?)
    }
}
