use axum::{routing::post, Router};

use crate::features::jobs::handlers::{self, JobsState};

pub fn routes(state: JobsState) -> Router {
    Router::new()
        .route("/api/jobs/run", post(handlers::run_jobs))
        .with_state(state)
}
