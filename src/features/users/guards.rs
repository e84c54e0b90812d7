//! Role-based access guards.
//!
//! Collections declare their access rules in terms of three predicates:
//! "anyone" (route mounted on the public router), "authenticated" (the
//! `AuthenticatedUser` extractor), and admin-only (the `RequireAdmin`
//! guard below).

use crate::core::error::AppError;
use crate::features::users::models::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for admin-only operations.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(user): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::Unauthorized("User not authenticated".to_string()))?;

        if !user.is_admin() {
            return Err(AppError::Forbidden("Admin access required".to_string()));
        }

        Ok(RequireAdmin(user.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{ROLE_ADMIN, ROLE_EDITOR};
    use axum::body::Body;
    use axum::http::Request;
    use uuid::Uuid;

    fn parts_with_roles(roles: &[&str]) -> Parts {
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        };
        let mut request = Request::new(Body::empty());
        request.extensions_mut().insert(user);
        request.into_parts().0
    }

    #[tokio::test]
    async fn admin_passes_guard() {
        let mut parts = parts_with_roles(&[ROLE_ADMIN]);
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn editor_is_forbidden() {
        let mut parts = parts_with_roles(&[ROLE_EDITOR]);
        assert!(matches!(
            RequireAdmin::from_request_parts(&mut parts, &()).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let mut parts = Request::new(Body::empty()).into_parts().0;
        assert!(matches!(
            RequireAdmin::from_request_parts(&mut parts, &()).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
