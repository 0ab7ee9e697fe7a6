//! Bearer token issuing and validation
//!
//! Tokens are HS256 JWTs. Access tokens authorize API calls; refresh tokens
//! can only be exchanged for a new pair at `/api/auth/refresh`.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Environment variable holding the token signing secret
pub const JWT_SECRET_ENV: &str = "TRAEVO_JWT_SECRET";
pub const ACCESS_MINUTES_ENV: &str = "TRAEVO_ACCESS_TOKEN_MINUTES";
pub const REFRESH_DAYS_ENV: &str = "TRAEVO_REFRESH_TOKEN_DAYS";

const DEFAULT_ACCESS_MINUTES: i64 = 30;
const DEFAULT_REFRESH_DAYS: i64 = 7;

/// Which endpoint family a token is valid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

/// Token signing configuration
#[derive(Clone)]
pub struct TokenConfig {
    secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_ttl: Duration::minutes(DEFAULT_ACCESS_MINUTES),
            refresh_ttl: Duration::days(DEFAULT_REFRESH_DAYS),
        }
    }

    /// Load from environment variables
    ///
    /// Returns None if `TRAEVO_JWT_SECRET` is unset or empty. Lifetimes fall
    /// back to 30 minutes / 7 days when unset or unparseable.
    pub fn from_env() -> Option<Self> {
        let secret = std::env::var(JWT_SECRET_ENV).ok().filter(|s| !s.is_empty())?;

        let access_minutes = std::env::var(ACCESS_MINUTES_ENV)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_ACCESS_MINUTES);
        let refresh_days = std::env::var(REFRESH_DAYS_ENV)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|d| *d > 0)
            .unwrap_or(DEFAULT_REFRESH_DAYS);

        Some(Self {
            secret,
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
        })
    }

    fn issue(&self, user_id: i64, token_type: TokenType) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };

        let claims = Claims {
            sub: user_id.to_string(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    /// Issue an access/refresh token pair for a user
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: self.issue(user_id, TokenType::Access)?,
            refresh_token: self.issue(user_id, TokenType::Refresh)?,
            token_type: "bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    /// Validate a token and return the user ID it was issued for
    ///
    /// Fails for bad signatures, expired tokens, malformed subjects and
    /// tokens of the wrong type.
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<i64, String> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))?;

        if claims.token_type != expected {
            return Err(format!(
                "Wrong token type: expected {:?}, got {:?}",
                expected, claims.token_type
            ));
        }

        claims
            .sub
            .parse()
            .map_err(|_| "Invalid token subject".to_string())
    }
}

/// Tokens returned by login and refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}
