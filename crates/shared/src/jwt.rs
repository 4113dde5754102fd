//! JWT issuance and validation.
//!
//! Access and refresh tokens are signed with RS256. Each token carries a
//! unique `jti` so refresh sessions can be tracked and revoked server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Failed to decode token: {0}")]
    Decoding(String),

    #[error("Token has expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

/// Distinguishes short-lived access tokens from long-lived refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims carried by every StudyBuddy token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Unique token id, hashed into the refresh-session table.
    pub jti: String,
    /// Access or refresh.
    pub kind: TokenKind,
}

/// Signing keys plus expiry policy.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
    /// Clock-skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtKeys {
    /// Builds keys from an RSA key pair in PEM format.
    pub fn from_rsa_pem(
        private_key_pem: &str,
        public_key_pem: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_ttl_secs,
            refresh_ttl_secs,
            leeway_secs,
        })
    }

    /// HS256 keys for unit tests only; production always uses RSA.
    #[cfg(test)]
    pub fn hs256_for_tests(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604_800,
            leeway_secs: 0,
        }
    }

    /// Issues an access token. Returns the token and its `jti`.
    pub fn issue_access(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.issue(user_id, TokenKind::Access, self.access_ttl_secs)
    }

    /// Issues a refresh token. Returns the token and its `jti`.
    pub fn issue_refresh(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_ttl_secs)
    }

    fn issue(
        &self,
        user_id: Uuid,
        kind: TokenKind,
        ttl_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            kind,
        };

        let header = Header::new(self.algorithm());
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::Encoding(e.to_string()))?;

        Ok((token, jti))
    }

    /// Decodes a token of the expected kind, enforcing expiry with leeway.
    pub fn decode_kind(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::Invalid,
                _ => JwtError::Decoding(e.to_string()),
            })?;

        if data.claims.kind != expected {
            return Err(JwtError::Invalid);
        }
        Ok(data.claims)
    }

    /// Decodes and validates an access token.
    pub fn decode_access(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_kind(token, TokenKind::Access)
    }

    /// Decodes and validates a refresh token.
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_kind(token, TokenKind::Refresh)
    }

    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

/// Extracts the user id from validated claims.
pub fn subject_uuid(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::Invalid)
}
