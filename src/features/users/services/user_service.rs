use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserDto, UserResponseDto};
use crate::features::users::models::{AuthenticatedUser, User};
use crate::shared::types::PaginationQuery;
use crate::shared::constants::{ROLE_ADMIN, ROLE_EDITOR};
use crate::shared::validation::slugify;

/// Service for user management and credential checks
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn hash_password(password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(password: &str, hashed: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hashed) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }

    /// Create a user with the given roles
    pub async fn create(&self, dto: CreateUserDto) -> Result<UserResponseDto> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(&dto.email)
        .fetch_one(&self.pool)
        .await?;

        if existing > 0 {
            return Err(AppError::Conflict(format!(
                "User with email '{}' already exists",
                dto.email
            )));
        }

        let hashed_password = Self::hash_password(&dto.password)?;
        let slug = dto.name.as_deref().map(slugify).filter(|s| !s.is_empty());
        let roles = if dto.roles.is_empty() {
            vec![ROLE_EDITOR.to_string()]
        } else {
            dto.roles
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, slug, email, hashed_password, roles)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&dto.name)
        .bind(&slug)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&roles)
        .fetch_one(&self.pool)
        .await?;

        info!("User created: id={}, email={}", user.id, user.email);

        Ok(user.into())
    }

    /// Seed the first admin account on an empty instance.
    ///
    /// User creation itself requires an admin token, so without this a
    /// fresh database has no way to mint its first login. Does nothing
    /// when the account already exists.
    pub async fn ensure_initial_admin(&self, email: &str, password: &str) -> Result<()> {
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        if existing > 0 {
            return Ok(());
        }

        let created = self.create(initial_admin_dto(email, password)).await?;
        info!("Initial admin seeded: id={}, email={}", created.id, created.email);

        Ok(())
    }

    /// Verify credentials and return the matching identity
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND is_active = TRUE",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        // Verify against a constant dummy hash when the user is unknown so
        // response timing does not reveal which emails exist
        let Some(user) = user else {
            let _ = Self::verify_password(password, DUMMY_HASH);
            return Err(AppError::Auth("Invalid email or password".to_string()));
        };

        if !Self::verify_password(password, &user.hashed_password) {
            return Err(AppError::Auth("Invalid email or password".to_string()));
        }

        Ok(AuthenticatedUser {
            id: user.id,
            email: user.email,
            roles: user.roles,
        })
    }

    /// Fetch a user by id
    pub async fn get(&self, id: Uuid) -> Result<UserResponseDto> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active = TRUE")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        user.map(|u| u.into())
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// List users, newest first
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<UserResponseDto>, i64)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE is_active = TRUE")
                .fetch_one(&self.pool)
                .await?;

        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE is_active = TRUE
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok((users.into_iter().map(|u| u.into()).collect(), total))
    }
}

fn initial_admin_dto(email: &str, password: &str) -> CreateUserDto {
    CreateUserDto {
        name: Some("Admin".to_string()),
        email: email.to_string(),
        password: password.to_string(),
        roles: vec![ROLE_ADMIN.to_string()],
    }
}

// Argon2 hash of an unused throwaway password, only there to equalize timing
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$GX2KGjvXK1mCTUZEbcUf5WR13GkFA+LmN4bwwFvjs/E";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trips() {
        let hashed = UserService::hash_password("correct horse battery staple").unwrap();
        assert!(UserService::verify_password(
            "correct horse battery staple",
            &hashed
        ));
        assert!(!UserService::verify_password("wrong password", &hashed));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!UserService::verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn seeded_admin_carries_the_admin_role() {
        let dto = initial_admin_dto("admin@example.com", "a-strong-password");
        assert_eq!(dto.email, "admin@example.com");
        assert_eq!(dto.roles, vec![ROLE_ADMIN.to_string()]);
    }
}
