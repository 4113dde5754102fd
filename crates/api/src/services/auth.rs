//! Authentication service: registration, login, token refresh, logout.
//!
//! Registration creates the user credential row and its profile row in a
//! single transaction so a signup can never leave a profile-less user.
//! Refresh sessions are tracked server-side with hashed JTIs and rotated
//! on every refresh.

use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use shared::crypto::sha256_hex;
use shared::jwt::{JwtError, JwtKeys};
use shared::password::{hash_password, verify_password, PasswordError};
use shared::validation::validate_username;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailTaken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    #[error("Invalid username")]
    InvalidUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("User is disabled")]
    UserDisabled,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Session not found")]
    SessionNotFound,

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub user_id: Uuid,
    pub email: String,
    pub username: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Result of a successful token refresh.
#[derive(Debug, Clone)]
pub struct RefreshResult {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Access + refresh pair with the JTIs used for session tracking.
#[derive(Debug, Clone)]
struct TokenPair {
    access_token: String,
    access_jti: String,
    refresh_token: String,
    refresh_jti: String,
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: Uuid,
    email: String,
    password_hash: String,
    username: String,
    is_active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    expires_at: chrono::DateTime<Utc>,
}

/// Authentication service.
pub struct AuthService {
    pool: PgPool,
    keys: Arc<JwtKeys>,
}

impl AuthService {
    /// Creates a new AuthService over the given pool and signing keys.
    pub fn new(pool: PgPool, keys: Arc<JwtKeys>) -> Self {
        Self { pool, keys }
    }

    /// Register a new user with email, password, and username.
    ///
    /// The credential and profile rows are inserted in one transaction.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<AuthResult, AuthError> {
        self.check_password_policy(password)?;
        validate_username(username).map_err(|_| AuthError::InvalidUsername)?;

        let password_hash = hash_password(password)?;
        let email = email.to_lowercase();
        let user_id = Uuid::new_v4();

        let mut tx = self.pool.begin().await?;

        let user_insert = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&email)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await;

        if is_unique_violation(&user_insert) {
            return Err(AuthError::EmailTaken);
        }
        user_insert?;

        let profile_insert = sqlx::query(
            r#"
            INSERT INTO profiles (id, username)
            VALUES ($1, $2)
            "#,
        )
        .bind(user_id)
        .bind(username)
        .execute(&mut *tx)
        .await;

        if is_unique_violation(&profile_insert) {
            return Err(AuthError::UsernameTaken);
        }
        profile_insert?;

        tx.commit().await?;

        let tokens = self.generate_tokens(user_id)?;
        self.create_session(user_id, &tokens).await?;

        Ok(AuthResult {
            user_id,
            email,
            username: username.to_string(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: self.keys.access_ttl_secs,
        })
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResult, AuthError> {
        let user: Option<CredentialRow> = sqlx::query_as(
            r#"
            SELECT u.id, u.email, u.password_hash, u.is_active, p.username
            FROM users u
            JOIN profiles p ON p.id = u.id
            WHERE u.email = $1
            "#,
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        let user = user.ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::UserDisabled);
        }

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        sqlx::query("UPDATE users SET last_login_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        let tokens = self.generate_tokens(user.id)?;
        self.create_session(user.id, &tokens).await?;

        Ok(AuthResult {
            user_id: user.id,
            email: user.email,
            username: user.username,
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: self.keys.access_ttl_secs,
        })
    }

    /// Refresh the token pair. The old refresh token is invalidated and a
    /// new pair is issued (rotation).
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, AuthError> {
        let claims = self
            .keys
            .decode_refresh(refresh_token)
            .map_err(|e| match e {
                JwtError::Expired | JwtError::Invalid => AuthError::InvalidRefreshToken,
                _ => AuthError::Token(e),
            })?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;
        let jti_hash = sha256_hex(&claims.jti);

        let session: Option<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, expires_at
            FROM user_sessions
            WHERE refresh_token_hash = $1 AND user_id = $2
            "#,
        )
        .bind(&jti_hash)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        let session = session.ok_or(AuthError::SessionNotFound)?;

        if session.expires_at < Utc::now() {
            sqlx::query("DELETE FROM user_sessions WHERE id = $1")
                .bind(session.id)
                .execute(&self.pool)
                .await?;
            return Err(AuthError::InvalidRefreshToken);
        }

        let user_active: Option<(bool,)> =
            sqlx::query_as("SELECT is_active FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let (is_active,) = user_active.ok_or(AuthError::UserNotFound)?;
        if !is_active {
            return Err(AuthError::UserDisabled);
        }

        let tokens = self.generate_tokens(user_id)?;
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.keys.refresh_ttl_secs);

        sqlx::query(
            r#"
            UPDATE user_sessions
            SET token_hash = $1, refresh_token_hash = $2, expires_at = $3, last_used_at = $4
            WHERE id = $5
            "#,
        )
        .bind(sha256_hex(&tokens.access_jti))
        .bind(sha256_hex(&tokens.refresh_jti))
        .bind(expires_at)
        .bind(now)
        .bind(session.id)
        .execute(&self.pool)
        .await?;

        Ok(RefreshResult {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: self.keys.access_ttl_secs,
        })
    }

    /// Logout by deleting the refresh session. With `all_devices`, every
    /// session of the user is removed. Idempotent.
    pub async fn logout(&self, refresh_token: &str, all_devices: bool) -> Result<(), AuthError> {
        let claims = self
            .keys
            .decode_refresh(refresh_token)
            .map_err(|e| match e {
                JwtError::Expired | JwtError::Invalid => AuthError::InvalidRefreshToken,
                _ => AuthError::Token(e),
            })?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidRefreshToken)?;

        if all_devices {
            sqlx::query("DELETE FROM user_sessions WHERE user_id = $1")
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        } else {
            let result = sqlx::query(
                "DELETE FROM user_sessions WHERE refresh_token_hash = $1 AND user_id = $2",
            )
            .bind(sha256_hex(&claims.jti))
            .bind(user_id)
            .execute(&self.pool)
            .await?;

            if result.rows_affected() == 0 {
                tracing::debug!(user_id = %user_id, "Session already gone during logout");
            }
        }

        Ok(())
    }

    /// Password policy: at least 8 characters with upper, lower, and digit.
    fn check_password_policy(&self, password: &str) -> Result<(), AuthError> {
        if password.len() < 8 {
            return Err(AuthError::WeakPassword(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one uppercase letter".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one lowercase letter".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::WeakPassword(
                "Password must contain at least one digit".to_string(),
            ));
        }
        Ok(())
    }

    fn generate_tokens(&self, user_id: Uuid) -> Result<TokenPair, AuthError> {
        let (access_token, access_jti) = self.keys.issue_access(user_id)?;
        let (refresh_token, refresh_jti) = self.keys.issue_refresh(user_id)?;

        Ok(TokenPair {
            access_token,
            access_jti,
            refresh_token,
            refresh_jti,
        })
    }

    async fn create_session(&self, user_id: Uuid, tokens: &TokenPair) -> Result<(), AuthError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::seconds(self.keys.refresh_ttl_secs);

        sqlx::query(
            r#"
            INSERT INTO user_sessions
                (id, user_id, token_hash, refresh_token_hash, expires_at, created_at, last_used_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(sha256_hex(&tokens.access_jti))
        .bind(sha256_hex(&tokens.refresh_jti))
        .bind(expires_at)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// PostgreSQL error code 23505 = unique_violation.
fn is_unique_violation<T>(result: &Result<T, sqlx::Error>) -> bool {
    if let Err(sqlx::Error::Database(db_err)) = result {
        return db_err.code().as_deref() == Some("23505");
    }
    false
}

#[cfg(test)]
mod tests {
    // Note: AuthService tests require a database connection and are
    // covered by the auth integration tests.
}
