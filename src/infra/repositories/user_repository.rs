//! Repository for system-wide accounts (admins and clients).

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{AdminContact, Role, User};
use crate::errors::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Name/email pairs of every administrator, for notification fan-out
    async fn admin_contacts(&self) -> AppResult<Vec<AdminContact>>;

    /// Insert a new user and return the persisted entity
    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> AppResult<User>;

    /// Replace the stored password hash for an existing user
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;
}

/// SeaORM-backed user store
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn admin_contacts(&self) -> AppResult<Vec<AdminContact>> {
        let rows: Vec<(String, String)> = UserEntity::find()
            .select_only()
            .column(user::Column::Name)
            .column(user::Column::Email)
            .filter(user::Column::Role.eq(Role::Admin.as_str()))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|(name, email)| AdminContact { name, email })
            .collect())
    }

    async fn create(
        &self,
        name: String,
        email: String,
        password_hash: String,
        role: Role,
    ) -> AppResult<User> {
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            email: Set(email),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_string()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;

        Ok(User::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(password_hash);
        active.update(&self.db).await.map_err(AppError::from)?;

        Ok(())
    }
}
