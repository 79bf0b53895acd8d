//! In-memory storage for development without a database and for tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::{AlertSubscription, NewAlertSubscription, NewSavedLocation, SavedLocation};

use super::{Account, NewAccount, Session, Storage};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    locations: BTreeMap<i64, SavedLocation>,
    subscriptions: BTreeMap<i64, AlertSubscription>,
    sessions: HashMap<Uuid, Session>,
    next_account_id: i64,
    next_location_id: i64,
    next_subscription_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_account_by_id(&self, id: i64) -> AppResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        let mut tables = self.tables.write().await;

        // Same guarantee as the unique indexes in Postgres
        if tables
            .accounts
            .values()
            .any(|a| a.username == account.username || a.email == account.email)
        {
            return Err(AppError::Conflict("Account already exists".to_string()));
        }

        let id = next_id(&mut tables.next_account_id);
        let created = Account {
            id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: Utc::now(),
        };
        tables.accounts.insert(id, created.clone());
        Ok(created)
    }

    async fn list_saved_locations(&self, user_id: i64) -> AppResult<Vec<SavedLocation>> {
        let tables = self.tables.read().await;
        Ok(tables
            .locations
            .values()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_saved_location(&self, id: i64) -> AppResult<Option<SavedLocation>> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }

    async fn create_saved_location(
        &self,
        user_id: i64,
        input: &NewSavedLocation,
    ) -> AppResult<SavedLocation> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_location_id);
        let location = SavedLocation {
            id,
            user_id,
            name: input.name.clone(),
            city: input.city.clone(),
            country: input.country.clone(),
            lat: input.lat.trim().to_string(),
            lon: input.lon.trim().to_string(),
            created_at: Utc::now(),
        };
        tables.locations.insert(id, location.clone());
        Ok(location)
    }

    async fn delete_saved_location(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.locations.remove(&id).is_some();
        if removed {
            tables.subscriptions.retain(|_, s| s.location_id != id);
        }
        Ok(removed)
    }

    async fn list_subscriptions(&self, user_id: i64) -> AppResult<Vec<AlertSubscription>> {
        let tables = self.tables.read().await;
        Ok(tables
            .subscriptions
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_subscription(&self, id: i64) -> AppResult<Option<AlertSubscription>> {
        Ok(self.tables.read().await.subscriptions.get(&id).cloned())
    }

    async fn create_subscription(
        &self,
        user_id: i64,
        input: &NewAlertSubscription,
    ) -> AppResult<AlertSubscription> {
        let mut tables = self.tables.write().await;
        let id = next_id(&mut tables.next_subscription_id);
        let subscription = AlertSubscription {
            id,
            user_id,
            location_id: input.location_id,
            alert_type: input.alert_type.clone(),
            enabled: input.enabled,
            created_at: Utc::now(),
        };
        tables.subscriptions.insert(id, subscription.clone());
        Ok(subscription)
    }

    async fn set_subscription_enabled(
        &self,
        id: i64,
        enabled: bool,
    ) -> AppResult<Option<AlertSubscription>> {
        let mut tables = self.tables.write().await;
        Ok(tables.subscriptions.get_mut(&id).map(|s| {
            s.enabled = enabled;
            s.clone()
        }))
    }

    async fn delete_subscription(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.subscriptions.remove(&id).is_some())
    }

    async fn create_session(&self, session: &Session) -> AppResult<()> {
        self.tables
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn find_session(&self, id: Uuid) -> AppResult<Option<Session>> {
        Ok(self.tables.read().await.sessions.get(&id).cloned())
    }

    async fn revoke_session(&self, id: Uuid) -> AppResult<()> {
        if let Some(session) = self.tables.write().await.sessions.get_mut(&id) {
            session.revoked = true;
        }
        Ok(())
    }

    async fn purge_sessions(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut tables = self.tables.write().await;
        let before = tables.sessions.len();
        tables.sessions.retain(|_, session| session.is_active(now));
        Ok((before - tables.sessions.len()) as u64)
    }
}
