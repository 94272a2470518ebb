//! Signed, time-limited bearer tokens
//!
//! Compact HS256 JWTs: `base64url(header).base64url(claims).base64url(mac)`
//! with HMAC-SHA256 over the first two segments. The issuer claim carries
//! the token's purpose so an access token is never accepted where a refresh
//! token is expected, and vice versa.

use crate::core_auth::error::TokenError;
use crate::core_store::UserId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime used when a caller asks for a zero TTL
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

const ALGORITHM: &str = "HS256";

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    Access,
    Refresh,
}

impl TokenPurpose {
    /// Issuer tag written into the `iss` claim
    pub fn issuer(&self) -> &'static str {
        match self {
            TokenPurpose::Access => "chirpy-access",
            TokenPurpose::Refresh => "chirpy-refresh",
        }
    }

    pub fn from_issuer(issuer: &str) -> Option<Self> {
        match issuer {
            "chirpy-access" => Some(TokenPurpose::Access),
            "chirpy-refresh" => Some(TokenPurpose::Refresh),
            _ => None,
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.issuer())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Registered claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Subject parsed back into a user id
    pub fn subject_id(&self) -> Result<UserId, TokenError> {
        self.sub
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| TokenError::InvalidSubject(self.sub.clone()))
    }

    pub fn purpose(&self) -> Option<TokenPurpose> {
        TokenPurpose::from_issuer(&self.iss)
    }
}

/// Access/refresh pair handed out on login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

/// Issues and verifies tokens with one shared secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner").field("secret", &"<redacted>").finish()
    }
}

impl TokenSigner {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        TokenSigner {
            secret: secret.as_ref().to_vec(),
        }
    }

    /// Issue a token for `subject` valid for `ttl` (zero means one hour)
    pub fn issue(&self, subject: UserId, purpose: TokenPurpose, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, purpose, ttl, Utc::now())
    }

    /// Issue as if the current instant were `now`
    pub fn issue_at(
        &self,
        subject: UserId,
        purpose: TokenPurpose,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = if ttl.is_zero() { DEFAULT_TOKEN_TTL } else { ttl };
        let ttl = chrono::Duration::from_std(ttl).map_err(|e| TokenError::InvalidTtl(e.to_string()))?;

        let claims = Claims {
            iss: purpose.issuer().to_string(),
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(ttl)
                .ok_or_else(|| TokenError::InvalidTtl("expiry out of range".to_string()))?
                .timestamp(),
        };
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?),
            URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims)?)
        );
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Issue an access token and a refresh token for the same subject
    pub fn issue_pair(
        &self,
        subject: UserId,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            token: self.issue(subject, TokenPurpose::Access, access_ttl)?,
            refresh_token: self.issue(subject, TokenPurpose::Refresh, refresh_ttl)?,
        })
    }

    /// Verify signature, expiry and purpose of `token`
    pub fn validate(&self, token: &str, expected: TokenPurpose) -> Result<Claims, TokenError> {
        self.validate_at(token, expected, Utc::now())
    }

    /// Validate as if the current instant were `now`
    pub fn validate_at(
        &self,
        token: &str,
        expected: TokenPurpose,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (header_b64, claims_b64, signature_b64) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(c), Some(s), None) => (h, c, s),
            _ => return Err(TokenError::Malformed("expected three segments".to_string())),
        };

        let header: Header = serde_json::from_slice(&decode_segment(header_b64)?)
            .map_err(|e| TokenError::Malformed(format!("header: {}", e)))?;
        if header.alg != ALGORITHM {
            return Err(TokenError::Malformed(format!("unsupported algorithm {}", header.alg)));
        }

        let signature = decode_segment(signature_b64)?;
        let mut mac = self.mac()?;
        mac.update(header_b64.as_bytes());
        mac.update(b".");
        mac.update(claims_b64.as_bytes());
        mac.verify_slice(&signature).map_err(|_| TokenError::BadSignature)?;

        let claims: Claims = serde_json::from_slice(&decode_segment(claims_b64)?)
            .map_err(|e| TokenError::Malformed(format!("claims: {}", e)))?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        if claims.iss != expected.issuer() {
            return Err(TokenError::WrongIssuer {
                expected: expected.issuer().to_string(),
                actual: claims.iss,
            });
        }
        Ok(claims)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|_| TokenError::InvalidKey)
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| TokenError::Malformed(format!("base64: {}", e)))
}
