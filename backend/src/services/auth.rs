//! Authentication service for registration, login and sessions
//!
//! A login creates a server-side session row; the client holds a signed
//! token naming the account (`sub`) and the session (`sid`). A token is
//! only accepted while its session exists, is unrevoked and unexpired, so
//! logout takes effect immediately.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use shared::{LoginInput, RegisterInput, User};

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use crate::storage::{NewAccount, Session, Storage};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    storage: Arc<dyn Storage>,
    secret: String,
    ttl_seconds: i64,
}

/// Session token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Account ID
    pub sid: String, // Session ID
    pub exp: i64,
    pub iat: i64,
}

/// Result of a successful login or registration
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub session_id: Uuid,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, config: &SessionConfig) -> Self {
        Self {
            storage,
            secret: config.secret.clone(),
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Create an account and log it in
    pub async fn register(&self, input: RegisterInput) -> AppResult<IssuedSession> {
        input.validate()?;

        if self
            .storage
            .find_account_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::InvalidRequest("Username already exists".to_string()));
        }

        if self.storage.find_account_by_email(&input.email).await?.is_some() {
            return Err(AppError::InvalidRequest("Email already exists".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let account = self
            .storage
            .create_account(NewAccount {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = account.id, "Account registered");

        self.start_session(account.to_public()).await
    }

    /// Authenticate with username and password
    pub async fn login(&self, input: LoginInput) -> AppResult<IssuedSession> {
        input.validate()?;

        let account = self
            .storage
            .find_account_by_username(&input.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &account.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.start_session(account.to_public()).await
    }

    /// Revoke the session behind a token. Unknown or invalid tokens are ignored.
    pub async fn logout(&self, token: &str) -> AppResult<()> {
        if let Ok(claims) = self.validate_token(token) {
            if let Ok(session_id) = Uuid::parse_str(&claims.sid) {
                self.storage.revoke_session(session_id).await?;
                tracing::debug!(%session_id, "Session revoked");
            }
        }
        Ok(())
    }

    /// Resolve a token to the identity of a live session
    pub async fn authenticate(&self, token: &str) -> AppResult<AuthUser> {
        let claims = self
            .validate_token(token)
            .map_err(|_| AppError::Unauthenticated)?;

        let user_id: i64 = claims.sub.parse().map_err(|_| AppError::Unauthenticated)?;
        let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::Unauthenticated)?;

        let session = self
            .storage
            .find_session(session_id)
            .await?
            .filter(|s| s.user_id == user_id && s.is_active(Utc::now()))
            .ok_or(AppError::Unauthenticated)?;

        Ok(AuthUser {
            user_id: session.user_id,
            session_id: session.id,
        })
    }

    /// Public account for an authenticated identity
    pub async fn current_user(&self, user: &AuthUser) -> AppResult<User> {
        self.storage
            .find_account_by_id(user.user_id)
            .await?
            .map(|account| account.to_public())
            .ok_or(AppError::Unauthenticated)
    }

    /// Validate token signature and expiry and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthenticated)?;

        Ok(token_data.claims)
    }

    async fn start_session(&self, user: User) -> AppResult<IssuedSession> {
        let now = Utc::now();

        let purged = self.storage.purge_sessions(now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Dropped stale sessions");
        }

        let session = Session {
            id: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at: now + Duration::seconds(self.ttl_seconds),
            revoked: false,
        };
        self.storage.create_session(&session).await?;

        let claims = Claims {
            sub: user.id.to_string(),
            sid: session.id.to_string(),
            exp: session.expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(IssuedSession {
            token,
            session_id: session.id,
            expires_at: session.expires_at,
            user,
        })
    }
}
