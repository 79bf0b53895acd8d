//! Alert subscription service
//!
//! A subscription may only reference a saved location owned by the same
//! user. Storage does not enforce this, so it is checked here on create
//! and on every change.

use std::sync::Arc;
use validator::Validate;

use shared::{AlertSubscription, NewAlertSubscription};

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

#[derive(Clone)]
pub struct SubscriptionService {
    storage: Arc<dyn Storage>,
}

impl SubscriptionService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, user_id: i64) -> AppResult<Vec<AlertSubscription>> {
        self.storage.list_subscriptions(user_id).await
    }

    pub async fn create(
        &self,
        user_id: i64,
        input: NewAlertSubscription,
    ) -> AppResult<AlertSubscription> {
        input.validate()?;

        self.ensure_location_owned(
            user_id,
            input.location_id,
            "Not authorized to create alerts for this location",
        )
        .await?;

        let subscription = self.storage.create_subscription(user_id, &input).await?;
        tracing::info!(
            user_id,
            subscription_id = subscription.id,
            alert_type = %subscription.alert_type,
            "Alert subscription created"
        );
        Ok(subscription)
    }

    /// Toggle a subscription on or off
    pub async fn set_enabled(
        &self,
        user_id: i64,
        subscription_id: i64,
        enabled: bool,
    ) -> AppResult<AlertSubscription> {
        let subscription = self
            .get_owned(user_id, subscription_id, "Not authorized to update this alert")
            .await?;

        self.ensure_location_owned(
            user_id,
            subscription.location_id,
            "Not authorized to update this alert",
        )
        .await?;

        self.storage
            .set_subscription_enabled(subscription_id, enabled)
            .await?
            .ok_or_else(|| AppError::NotFound("Alert".to_string()))
    }

    pub async fn delete(&self, user_id: i64, subscription_id: i64) -> AppResult<()> {
        self.get_owned(user_id, subscription_id, "Not authorized to delete this alert")
            .await?;

        if !self.storage.delete_subscription(subscription_id).await? {
            return Err(AppError::NotFound("Alert".to_string()));
        }
        Ok(())
    }

    async fn get_owned(
        &self,
        user_id: i64,
        subscription_id: i64,
        forbidden: &str,
    ) -> AppResult<AlertSubscription> {
        let subscription = self
            .storage
            .get_subscription(subscription_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Alert".to_string()))?;

        if subscription.user_id != user_id {
            return Err(AppError::Forbidden(forbidden.to_string()));
        }
        Ok(subscription)
    }

    async fn ensure_location_owned(
        &self,
        user_id: i64,
        location_id: i64,
        forbidden: &str,
    ) -> AppResult<()> {
        let location = self
            .storage
            .get_saved_location(location_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        if location.user_id != user_id {
            return Err(AppError::Forbidden(forbidden.to_string()));
        }
        Ok(())
    }
}
