use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::{ROLE_ADMIN, ROLE_EDITOR};

/// Database model for users
#[derive(Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub email: String,
    pub hashed_password: String,
    pub roles: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The identity carried through request extensions once a bearer token
/// has been validated.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check if user is an admin
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }

    /// Check if user can manage content (media, taxonomies)
    pub fn is_editor(&self) -> bool {
        self.is_admin() || self.has_role(ROLE_EDITOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_implies_editor_access() {
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "admin@example.com".to_string(),
            roles: vec![ROLE_ADMIN.to_string()],
        };
        assert!(user.is_admin());
        assert!(user.is_editor());
    }

    #[test]
    fn editor_is_not_admin() {
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "editor@example.com".to_string(),
            roles: vec![ROLE_EDITOR.to_string()],
        };
        assert!(!user.is_admin());
        assert!(user.is_editor());
    }
}
