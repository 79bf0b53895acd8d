//! Persistence gateway
//!
//! Accounts, saved locations, alert subscriptions and sessions live behind
//! the [`Storage`] trait. [`PgStorage`] is used when a database URL is
//! configured; [`MemoryStorage`] otherwise and in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use shared::{AlertSubscription, NewAlertSubscription, NewSavedLocation, SavedLocation, User};

use crate::error::AppResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Stored account, including the password hash
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn to_public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

/// Account to insert; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Server-side login session
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: Uuid,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl Session {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Connectivity check for the health endpoint
    async fn ping(&self) -> AppResult<()>;

    // Accounts
    async fn find_account_by_id(&self, id: i64) -> AppResult<Option<Account>>;
    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>>;
    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>>;
    async fn create_account(&self, account: NewAccount) -> AppResult<Account>;

    // Saved locations
    async fn list_saved_locations(&self, user_id: i64) -> AppResult<Vec<SavedLocation>>;
    async fn get_saved_location(&self, id: i64) -> AppResult<Option<SavedLocation>>;
    async fn create_saved_location(
        &self,
        user_id: i64,
        input: &NewSavedLocation,
    ) -> AppResult<SavedLocation>;
    /// Deletes the location and its subscriptions
    async fn delete_saved_location(&self, id: i64) -> AppResult<bool>;

    // Alert subscriptions
    async fn list_subscriptions(&self, user_id: i64) -> AppResult<Vec<AlertSubscription>>;
    async fn get_subscription(&self, id: i64) -> AppResult<Option<AlertSubscription>>;
    async fn create_subscription(
        &self,
        user_id: i64,
        input: &NewAlertSubscription,
    ) -> AppResult<AlertSubscription>;
    async fn set_subscription_enabled(
        &self,
        id: i64,
        enabled: bool,
    ) -> AppResult<Option<AlertSubscription>>;
    async fn delete_subscription(&self, id: i64) -> AppResult<bool>;

    // Sessions
    async fn create_session(&self, session: &Session) -> AppResult<()>;
    async fn find_session(&self, id: Uuid) -> AppResult<Option<Session>>;
    async fn revoke_session(&self, id: Uuid) -> AppResult<()>;
    /// Drop revoked sessions and those expired at `now`, returning how many
    async fn purge_sessions(&self, now: DateTime<Utc>) -> AppResult<u64>;
}
