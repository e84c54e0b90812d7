use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::error::AppError;
use crate::features::users::models::AuthenticatedUser;

/// Issues and validates HS256 access tokens signed with the application
/// secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_secs: u64,
    leeway_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    roles: Vec<String>,
    iat: u64,
    exp: u64,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            token_expiry_secs: config.token_expiry.as_secs(),
            leeway_secs: config.leeway.as_secs(),
        }
    }

    /// Issue a signed access token for the given identity
    pub fn issue(&self, user: &AuthenticatedUser) -> Result<String, AppError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(format!("System clock error: {}", e)))?
            .as_secs();

        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            iat: now,
            exp: now + self.token_expiry_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Validate a token and recover the identity it was issued for
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(e.to_string()))?;

        let claims = token_data.claims;

        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Invalid subject claim".to_string()))?;

        Ok(AuthenticatedUser {
            id,
            email: claims.email,
            roles: claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use std::time::Duration;

    fn service(expiry_secs: u64) -> TokenService {
        TokenService::new(AuthConfig {
            secret: "0123456789abcdef0123456789abcdef".to_string(),
            token_expiry: Duration::from_secs(expiry_secs),
            leeway: Duration::from_secs(0),
            initial_admin_email: None,
            initial_admin_password: None,
        })
    }

    #[test]
    fn issued_token_round_trips() {
        let tokens = service(3600);
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: SafeEmail().fake(),
            roles: vec!["editor".to_string()],
        };

        let token = tokens.issue(&user).unwrap();
        let verified = tokens.verify(&token).unwrap();

        assert_eq!(verified.id, user.id);
        assert_eq!(verified.email, user.email);
        assert_eq!(verified.roles, user.roles);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let tokens = service(3600);
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let issuer = TokenService::new(AuthConfig {
            secret: "another-secret-another-secret-another".to_string(),
            token_expiry: Duration::from_secs(3600),
            leeway: Duration::from_secs(0),
            initial_admin_email: None,
            initial_admin_password: None,
        });
        let verifier = service(3600);

        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "user@example.com".to_string(),
            roles: vec![],
        };
        let token = issuer.issue(&user).unwrap();

        assert!(verifier.verify(&token).is_err());
    }
}
