//! Authentication service - Handles account registration and authentication.
//!
//! Two account families share the login endpoint: system-wide users
//! (administrators and clients) and staff accounts bound to a location.
//! The issued token carries the role so the API layer can authorize
//! without a second lookup.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, ROLE_LOCAL_USER, SECONDS_PER_DAY, TOKEN_TYPE_BEARER};
use crate::domain::{Account, Password, Role, StaffUser, User};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 259200)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a system-wide account (administrator or client)
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> AppResult<User>;

    /// Register a staff account bound to a location
    async fn register_staff(
        &self,
        name: String,
        email: String,
        password: String,
        location_id: Uuid,
    ) -> AppResult<StaffUser>;

    /// Login and return JWT token.
    ///
    /// Both account families are consulted: system-wide users first,
    /// then staff.
    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse>;

    /// Replace a user's password after verifying the current one
    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a token to the account it was issued for
    async fn authenticate(&self, token: &str) -> AppResult<Account>;
}

/// Generate JWT token for an account (shared helper to avoid duplication)
fn generate_token(id: Uuid, email: &str, role: &str, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.token_expiration_days);

    let claims = Claims {
        sub: id,
        email: email.to_string(),
        role: role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.token_expiration_days * SECONDS_PER_DAY,
    })
}

/// Verify JWT token and extract claims (shared helper)
fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
        role: Role,
    ) -> AppResult<User> {
        // Email format is validated by the handler's ValidatedJson extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow.users().create(name, email, password_hash, role).await
    }

    async fn register_staff(
        &self,
        name: String,
        email: String,
        password: String,
        location_id: Uuid,
    ) -> AppResult<StaffUser> {
        // The bound location must exist up front
        self.uow
            .locations()
            .find_by_id(location_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self.uow.staff().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Staff user"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .staff()
            .create(name, email, password_hash, location_id)
            .await
    }

    async fn login(&self, email: String, password: String) -> AppResult<TokenResponse> {
        let account = match self.uow.users().find_by_email(&email).await? {
            Some(user) => Some(Account::User(user)),
            None => self
                .uow
                .staff()
                .find_by_email(&email)
                .await?
                .map(Account::Staff),
        };

        // Verify against a dummy hash when no account matches, so response
        // time does not reveal whether the email exists.
        let stored_password = match &account {
            Some(account) => Password::from_hash(account.password_hash().to_string()),
            None => Password::dummy(),
        };

        let password_valid = stored_password.verify(&password);

        let account = match account {
            Some(account) if password_valid => account,
            _ => return Err(AppError::InvalidCredentials),
        };
        generate_token(
            account.id(),
            account.email(),
            account.role().as_str(),
            &self.config,
        )
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let stored = Password::from_hash(user.password_hash.clone());
        if !stored.verify(&current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let new_hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user_id, new_hash).await
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<Account> {
        let claims = self.verify_token(token)?;

        // The role stored in the token decides which table the account
        // lives in; a stale token for a deleted account fails here.
        let account = if claims.role == ROLE_LOCAL_USER {
            self.uow
                .staff()
                .find_by_id(claims.sub)
                .await?
                .map(Account::Staff)
        } else {
            self.uow
                .users()
                .find_by_id(claims.sub)
                .await?
                .map(Account::User)
        };

        account.ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        MockLocationRepository, MockRequestRepository, MockStaffRepository, MockUserRepository,
    };
    use crate::services::test_support::StubUow;

    fn authenticator(
        users: MockUserRepository,
        staff: MockStaffRepository,
        locations: MockLocationRepository,
    ) -> Authenticator<StubUow> {
        let uow = Arc::new(StubUow::new(
            users,
            staff,
            locations,
            MockRequestRepository::new(),
        ));
        Authenticator::new(uow, Config::test_default())
    }

    fn user_with_password(password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Maria".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            role: Role::Client,
        }
    }

    fn staff_with_password(password: &str) -> StaffUser {
        StaffUser {
            id: Uuid::new_v4(),
            name: "Staff".to_string(),
            email: "staff@example.com".to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            location_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut staff = MockStaffRepository::new();
        staff.expect_find_by_email().returning(|_| Ok(None));

        let auth = authenticator(users, staff, MockLocationRepository::new());
        let result = auth
            .login("ghost@example.com".to_string(), "whatever".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_indistinguishable() {
        let user = user_with_password("correct1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = authenticator(users, MockStaffRepository::new(), MockLocationRepository::new());
        let result = auth
            .login("maria@example.com".to_string(), "wrong123".to_string())
            .await;

        // Same error as for an unknown email
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_falls_back_to_staff_table() {
        let staff_user = staff_with_password("secret1");
        let staff_id = staff_user.id;

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut staff = MockStaffRepository::new();
        staff
            .expect_find_by_email()
            .returning(move |_| Ok(Some(staff_user.clone())));

        let auth = authenticator(users, staff, MockLocationRepository::new());
        let token = auth
            .login("staff@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap();

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, staff_id);
        assert_eq!(claims.role, ROLE_LOCAL_USER);
        assert_eq!(token.token_type, TOKEN_TYPE_BEARER);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let existing = user_with_password("secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));

        let auth = authenticator(users, MockStaffRepository::new(), MockLocationRepository::new());
        let result = auth
            .register(
                "Maria".to_string(),
                "maria@example.com".to_string(),
                "secret1".to_string(),
                Role::Client,
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_register_staff_requires_existing_location() {
        let mut locations = MockLocationRepository::new();
        locations.expect_find_by_id().returning(|_| Ok(None));

        let auth = authenticator(
            MockUserRepository::new(),
            MockStaffRepository::new(),
            locations,
        );
        let result = auth
            .register_staff(
                "Staff".to_string(),
                "staff@example.com".to_string(),
                "secret1".to_string(),
                Uuid::new_v4(),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_change_password_rejects_wrong_current() {
        let user = user_with_password("correct1");
        let user_id = user.id;
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = authenticator(users, MockStaffRepository::new(), MockLocationRepository::new());
        let result = auth
            .change_password(user_id, "wrong123".to_string(), "newpass1".to_string())
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_staff_token_to_staff_account() {
        let staff_user = staff_with_password("secret1");
        let staff_id = staff_user.id;
        let lookup = staff_user.clone();

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        let mut staff = MockStaffRepository::new();
        staff
            .expect_find_by_email()
            .returning(move |_| Ok(Some(staff_user.clone())));
        staff
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lookup.clone())));

        let auth = authenticator(users, staff, MockLocationRepository::new());
        let token = auth
            .login("staff@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap();

        let account = auth.authenticate(&token.access_token).await.unwrap();
        assert_eq!(account.id(), staff_id);
        assert!(matches!(account, Account::Staff(_)));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_stale_token_for_deleted_account() {
        let user = user_with_password("secret1");
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        // Account vanished between login and the next request
        users.expect_find_by_id().returning(|_| Ok(None));

        let auth = authenticator(users, MockStaffRepository::new(), MockLocationRepository::new());
        let token = auth
            .login("maria@example.com".to_string(), "secret1".to_string())
            .await
            .unwrap();

        let result = auth.authenticate(&token.access_token).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let auth = authenticator(
            MockUserRepository::new(),
            MockStaffRepository::new(),
            MockLocationRepository::new(),
        );
        assert!(auth.verify_token("not-a-jwt").is_err());
    }
}
