//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{Account, Role};
use crate::errors::AppError;

/// Authenticated caller resolved from a JWT token.
///
/// Built from a live account row, not just the claims: a token whose
/// subject has since been deleted never gets past the middleware.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    /// Present only for staff accounts
    pub location_id: Option<Uuid>,
}

impl CurrentUser {
    /// Check if the caller has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if the caller is a location-bound staff account.
    pub fn is_staff(&self) -> bool {
        self.role == Role::LocalUser
    }
}

impl From<Account> for CurrentUser {
    fn from(account: Account) -> Self {
        Self {
            id: account.id(),
            email: account.email().to_string(),
            role: account.role(),
            location_id: account.location_id(),
        }
    }
}

/// JWT authentication middleware.
///
/// Extracts the bearer token, resolves it to a live account and injects
/// the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let account = state.auth_service.authenticate(token).await?;

    request.extensions_mut().insert(CurrentUser::from(account));

    Ok(next.run(request).await)
}

/// Optional JWT authentication middleware.
///
/// The request subtree mixes public intake endpoints with admin triage
/// on the same paths, so authentication is resolved when a token is
/// presented and the handlers enforce roles. A missing header passes
/// through anonymously; a presented but invalid token is still rejected.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX));

    if let Some(token) = bearer {
        let account = state.auth_service.authenticate(token).await?;
        request.extensions_mut().insert(CurrentUser::from(account));
    }

    Ok(next.run(request).await)
}

/// Require an authenticated admin on an optionally-authenticated route.
///
/// Anonymous callers get Unauthorized, authenticated non-admins Forbidden.
pub fn require_admin_caller(user: Option<&CurrentUser>) -> Result<&CurrentUser, AppError> {
    match user {
        None => Err(AppError::Unauthorized),
        Some(u) if u.is_admin() => Ok(u),
        Some(_) => Err(AppError::Forbidden),
    }
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Require a staff account and return its location binding.
pub fn require_staff(user: &CurrentUser) -> Result<Uuid, AppError> {
    match user.location_id {
        Some(location_id) if user.is_staff() => Ok(location_id),
        _ => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff_user() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "staff@example.com".to_string(),
            role: Role::LocalUser,
            location_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_require_admin_denies_client_and_staff() {
        let client = CurrentUser {
            id: Uuid::new_v4(),
            email: "client@example.com".to_string(),
            role: Role::Client,
            location_id: None,
        };
        assert!(require_admin(&client).is_err());
        assert!(require_admin(&staff_user()).is_err());
    }

    #[test]
    fn test_require_staff_returns_location_binding() {
        let staff = staff_user();
        assert_eq!(require_staff(&staff).unwrap(), staff.location_id.unwrap());
    }

    #[test]
    fn test_require_staff_denies_admin() {
        let admin = CurrentUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
            location_id: None,
        };
        assert!(require_staff(&admin).is_err());
    }
}
