use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::jobs::services::{JobRunReport, JobService};
use crate::features::users::services::TokenService;
use crate::shared::types::ApiResponse;

#[derive(Clone)]
pub struct JobsState {
    pub jobs: Arc<JobService>,
    pub tokens: Arc<TokenService>,
    pub cron_secret: Option<String>,
}

/// Admit a maintenance run when the bearer token is either the shared
/// cron secret or a valid user token. The cron secret is checked first
/// so scheduler calls never touch token verification.
fn authorize_run(
    headers: &HeaderMap,
    tokens: &TokenService,
    cron_secret: Option<&str>,
) -> Result<(), AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Auth("Missing bearer token".to_string()))?;

    if cron_secret.is_some_and(|secret| secret == token) {
        return Ok(());
    }

    tokens.verify(token).map(|_| ())
}

/// Trigger a maintenance run
///
/// Accepts either a logged-in user's bearer token or the shared cron secret,
/// so an external scheduler can call this without a user account.
#[utoipa::path(
    post,
    path = "/api/jobs/run",
    tag = "jobs",
    responses(
        (status = 200, description = "Maintenance run report", body = ApiResponse<JobRunReport>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn run_jobs(
    State(state): State<JobsState>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<JobRunReport>>, AppError> {
    authorize_run(&headers, &state.tokens, state.cron_secret.as_deref())?;

    let report = state.jobs.run().await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use crate::features::users::models::AuthenticatedUser;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(AuthConfig {
            secret: "a-test-secret-that-is-long-enough-0".to_string(),
            token_expiry: std::time::Duration::from_secs(3600),
            leeway: std::time::Duration::from_secs(0),
            initial_admin_email: None,
            initial_admin_password: None,
        }))
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn configured_cron_secret_admits_the_run() {
        let tokens = token_service();
        let headers = bearer("scheduler-secret");
        assert!(authorize_run(&headers, &tokens, Some("scheduler-secret")).is_ok());
    }

    #[test]
    fn wrong_secret_falls_through_to_token_verification() {
        let tokens = token_service();
        let headers = bearer("not-the-secret");
        let result = authorize_run(&headers, &tokens, Some("scheduler-secret"));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[test]
    fn user_token_admits_the_run_without_cron_secret() {
        let tokens = token_service();
        let user = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "editor@example.com".to_string(),
            roles: vec!["editor".to_string()],
        };
        let token = tokens.issue(&user).unwrap();
        let headers = bearer(&token);
        assert!(authorize_run(&headers, &tokens, None).is_ok());
    }

    #[test]
    fn missing_authorization_header_is_rejected() {
        let tokens = token_service();
        let headers = HeaderMap::new();
        let result = authorize_run(&headers, &tokens, Some("scheduler-secret"));
        assert!(matches!(result, Err(AppError::Auth(_))));
    }
}
