//! Saved location service

use std::sync::Arc;
use validator::Validate;

use shared::{NewSavedLocation, SavedLocation};

use crate::error::{AppError, AppResult};
use crate::storage::Storage;

/// Saved location service
#[derive(Clone)]
pub struct SavedLocationService {
    storage: Arc<dyn Storage>,
}

impl SavedLocationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// List the user's saved locations
    pub async fn list(&self, user_id: i64) -> AppResult<Vec<SavedLocation>> {
        self.storage.list_saved_locations(user_id).await
    }

    /// Save a location for the user
    pub async fn create(&self, user_id: i64, input: NewSavedLocation) -> AppResult<SavedLocation> {
        input.validate()?;

        let location = self.storage.create_saved_location(user_id, &input).await?;
        tracing::info!(user_id, location_id = location.id, "Saved location created");
        Ok(location)
    }

    /// Fetch a location the user owns.
    ///
    /// Missing locations are `NotFound`; another user's are `Forbidden`.
    pub async fn get_owned(&self, user_id: i64, location_id: i64) -> AppResult<SavedLocation> {
        let location = self
            .storage
            .get_saved_location(location_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        if location.user_id != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to access this location".to_string(),
            ));
        }

        Ok(location)
    }

    /// Delete a location the user owns
    pub async fn delete(&self, user_id: i64, location_id: i64) -> AppResult<()> {
        let location = self
            .storage
            .get_saved_location(location_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        if location.user_id != user_id {
            return Err(AppError::Forbidden(
                "Not authorized to delete this location".to_string(),
            ));
        }

        if !self.storage.delete_saved_location(location_id).await? {
            // Removed concurrently
            return Err(AppError::NotFound("Location".to_string()));
        }

        tracing::info!(user_id, location_id, "Saved location deleted");
        Ok(())
    }
}
