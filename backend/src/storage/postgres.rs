//! PostgreSQL storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{AlertSubscription, NewAlertSubscription, NewSavedLocation, SavedLocation};

use super::{Account, NewAccount, Session, Storage};
use crate::error::{AppError, AppResult};

/// Postgres unique_violation
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStorage {
    db: PgPool,
}

impl PgStorage {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct SavedLocationRow {
    id: i64,
    user_id: i64,
    name: String,
    city: String,
    country: String,
    lat: String,
    lon: String,
    created_at: DateTime<Utc>,
}

impl From<SavedLocationRow> for SavedLocation {
    fn from(row: SavedLocationRow) -> Self {
        SavedLocation {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            city: row.city,
            country: row.country,
            lat: row.lat,
            lon: row.lon,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SubscriptionRow {
    id: i64,
    user_id: i64,
    location_id: i64,
    alert_type: String,
    enabled: bool,
    created_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for AlertSubscription {
    fn from(row: SubscriptionRow) -> Self {
        AlertSubscription {
            id: row.id,
            user_id: row.user_id,
            location_id: row.location_id,
            alert_type: row.alert_type,
            enabled: row.enabled,
            created_at: row.created_at,
        }
    }
}

fn map_unique_violation(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, created_at";
const LOCATION_COLUMNS: &str = "id, user_id, name, city, country, lat, lon, created_at";
const SUBSCRIPTION_COLUMNS: &str = "id, user_id, location_id, alert_type, enabled, created_at";

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }

    async fn find_account_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM users WHERE username = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {} FROM users WHERE email = $1",
            ACCOUNT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(account)
    }

    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_unique_violation(e, "Account already exists"))
    }

    async fn list_saved_locations(&self, user_id: i64) -> AppResult<Vec<SavedLocation>> {
        let rows = sqlx::query_as::<_, SavedLocationRow>(&format!(
            "SELECT {} FROM saved_locations WHERE user_id = $1 ORDER BY id",
            LOCATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(SavedLocation::from).collect())
    }

    async fn get_saved_location(&self, id: i64) -> AppResult<Option<SavedLocation>> {
        let row = sqlx::query_as::<_, SavedLocationRow>(&format!(
            "SELECT {} FROM saved_locations WHERE id = $1",
            LOCATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(SavedLocation::from))
    }

    async fn create_saved_location(
        &self,
        user_id: i64,
        input: &NewSavedLocation,
    ) -> AppResult<SavedLocation> {
        let row = sqlx::query_as::<_, SavedLocationRow>(&format!(
            r#"
            INSERT INTO saved_locations (user_id, name, city, country, lat, lon)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            LOCATION_COLUMNS
        ))
        .bind(user_id)
        .bind(&input.name)
        .bind(&input.city)
        .bind(&input.country)
        .bind(input.lat.trim())
        .bind(input.lon.trim())
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn delete_saved_location(&self, id: i64) -> AppResult<bool> {
        // alert_subscriptions.location_id cascades
        let result = sqlx::query("DELETE FROM saved_locations WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_subscriptions(&self, user_id: i64) -> AppResult<Vec<AlertSubscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {} FROM alert_subscriptions WHERE user_id = $1 ORDER BY id",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(AlertSubscription::from).collect())
    }

    async fn get_subscription(&self, id: i64) -> AppResult<Option<AlertSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "SELECT {} FROM alert_subscriptions WHERE id = $1",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(AlertSubscription::from))
    }

    async fn create_subscription(
        &self,
        user_id: i64,
        input: &NewAlertSubscription,
    ) -> AppResult<AlertSubscription> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            r#"
            INSERT INTO alert_subscriptions (user_id, location_id, alert_type, enabled)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SUBSCRIPTION_COLUMNS
        ))
        .bind(user_id)
        .bind(input.location_id)
        .bind(&input.alert_type)
        .bind(input.enabled)
        .fetch_one(&self.db)
        .await?;
        Ok(row.into())
    }

    async fn set_subscription_enabled(
        &self,
        id: i64,
        enabled: bool,
    ) -> AppResult<Option<AlertSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionRow>(&format!(
            "UPDATE alert_subscriptions SET enabled = $2 WHERE id = $1 RETURNING {}",
            SUBSCRIPTION_COLUMNS
        ))
        .bind(id)
        .bind(enabled)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(AlertSubscription::from))
    }

    async fn delete_subscription(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alert_subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_session(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, user_id, created_at, expires_at, revoked)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .bind(session.revoked)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, created_at, expires_at, revoked FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(session)
    }

    async fn revoke_session(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE sessions SET revoked = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn purge_sessions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE revoked OR expires_at <= $1")
            .bind(now)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
