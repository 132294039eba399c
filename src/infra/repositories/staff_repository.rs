//! Repository for location-bound staff accounts.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::staff_user::{self, Entity as StaffEntity};
use crate::config::ROLE_LOCAL_USER;
use crate::domain::StaffUser;
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// Staff repository trait for dependency injection.
///
/// Same shape as the user repository, scoped to the staff namespace;
/// staff emails are unique among staff accounts only.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Find staff account by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<StaffUser>>;

    /// Find staff account by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StaffUser>>;

    /// Insert a new staff account bound to a location
    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        location_id: Uuid,
    ) -> AppResult<StaffUser>;
}

/// SeaORM-backed staff store
pub struct StaffStore {
    db: DatabaseConnection,
}

impl StaffStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StaffRepository for StaffStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<StaffUser>> {
        let result = StaffEntity::find()
            .filter(staff_user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(StaffUser::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<StaffUser>> {
        let result = StaffEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(StaffUser::from))
    }

    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        location_id: Uuid,
    ) -> AppResult<StaffUser> {
        let active_model = staff_user::ActiveModel {
            id: Set(Uuid::new_v4()),
            location_id: Set(location_id),
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(ROLE_LOCAL_USER.to_string()),
            // Assigned by the database
            created_at: NotSet,
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(StaffUser::from(model))
    }
}
