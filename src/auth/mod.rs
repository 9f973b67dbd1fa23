pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password, PasswordError};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_idx: i64,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_idx: i64, ttl: Duration) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::TokenGeneration("expiry is out of range".to_string()))?
            .timestamp();

        Ok(Self {
            user_idx,
            exp,
            iat: now.timestamp(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
    #[error("JWT expiry of {0} hours is out of range")]
    InvalidExpiry(u64),
    #[error("JWT has expired")]
    Expired,
    #[error("Invalid JWT: {0}")]
    Invalid(String),
}

/// Issues and validates HS256 access tokens carrying a `user_idx` claim.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_hours", &self.ttl.num_hours())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, expiry_hours: u64) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        // Tokens issued now must carry a representable exp
        let ttl = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or(JwtError::InvalidExpiry(expiry_hours))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        })
    }

    pub fn from_config(security: &SecurityConfig) -> Result<Self, JwtError> {
        Self::new(&security.jwt_secret, security.jwt_expiry_hours)
    }

    pub fn issue(&self, user_idx: i64) -> Result<String, JwtError> {
        self.encode_claims(&Claims::new(user_idx, self.ttl)?)
    }

    /// Returns the user the token was issued to
    pub fn validate(&self, token: &str) -> Result<i64, JwtError> {
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })?;

        Ok(token_data.claims.user_idx)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }
}
