use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::users::handlers::{create_user, get_me, get_user, list_users, login};
use crate::features::users::services::{TokenService, UserService};

/// Shared state for the users feature
#[derive(Clone)]
pub struct UsersState {
    pub users: Arc<UserService>,
    pub tokens: Arc<TokenService>,
}

/// Routes open to anyone
pub fn public_routes(state: UsersState) -> Router {
    Router::new()
        .route("/api/users/login", post(login))
        .with_state(state)
}

/// Routes requiring an authenticated user
pub fn protected_routes(state: UsersState) -> Router {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/me", get(get_me))
        .route("/api/users/{id}", get(get_user))
        .with_state(state)
}
