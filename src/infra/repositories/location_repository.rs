//! Repository for locations.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::location::{self, Entity as LocationEntity};
use crate::domain::{Location, NewLocation};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Location repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// Find location by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Location>>;

    /// Find every location registered for a city/state pair.
    ///
    /// Lookup is case-insensitive: stored values are uppercased and the
    /// query normalizes its inputs the same way.
    async fn find_by_city_state(&self, city: &str, state: &str) -> AppResult<Vec<Location>>;

    /// Insert a new location (fields are uppercased) and return it
    async fn create(&self, location: NewLocation) -> AppResult<Location>;

    /// Corrective edit of an existing location
    async fn update(&self, location: Location) -> AppResult<Location>;
}

/// SeaORM-backed location store
pub struct LocationStore {
    db: DatabaseConnection,
}

impl LocationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LocationRepository for LocationStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Location>> {
        let result = LocationEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Location::from))
    }

    async fn find_by_city_state(&self, city: &str, state: &str) -> AppResult<Vec<Location>> {
        let models = LocationEntity::find()
            .filter(location::Column::City.eq(city.to_uppercase()))
            .filter(location::Column::State.eq(state.to_uppercase()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Location::from).collect())
    }

    async fn create(&self, location: NewLocation) -> AppResult<Location> {
        let normalized = location.normalized();
        let active_model = location::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(normalized.name),
            city: Set(normalized.city),
            state: Set(normalized.state),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(Location::from(model))
    }

    async fn update(&self, location: Location) -> AppResult<Location> {
        let existing = LocationEntity::find_by_id(location.id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let normalized = NewLocation::new(location.name, location.city, location.state).normalized();

        let mut active: location::ActiveModel = existing.into();
        active.name = Set(normalized.name);
        active.city = Set(normalized.city);
        active.state = Set(normalized.state);

        let model = active.update(&self.db).await.map_err(AppError::from)?;

        Ok(Location::from(model))
    }
}
