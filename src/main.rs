mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::categories::{routes as categories_routes, services::CategoryService};
use crate::features::jobs::{
    handlers::JobsState, routes as jobs_routes, services::JobService,
};
use crate::features::media::{
    resolver::{template_from_config, UrlTemplate},
    routes as media_routes,
    services::MediaService,
};
use crate::features::tags::{routes as tags_routes, services::TagService};
use crate::features::users::routes::{self as users_routes, UsersState};
use crate::features::users::services::{TokenService, UserService};
use crate::modules::storage::SpacesClient;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Create database connection pool
    let pool = database::create_pool(&config.database).await?;
    tracing::info!("Database connection pool created");

    // Run migrations automatically
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations completed successfully");

    // Initialize auth services
    let token_service = Arc::new(TokenService::new(config.auth.clone()));
    let user_service = Arc::new(UserService::new(pool.clone()));
    tracing::info!("Auth services initialized");

    // Seed the first admin account so a fresh instance can log in
    if let (Some(email), Some(password)) = (
        &config.auth.initial_admin_email,
        &config.auth.initial_admin_password,
    ) {
        user_service
            .ensure_initial_admin(email, password)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to seed initial admin: {}", e))?;
    }

    // Initialize Spaces client for media storage
    let spaces_client = Arc::new(
        SpacesClient::new(config.storage.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize storage client: {}", e))?,
    );
    tracing::info!(
        "Storage client initialized for bucket: {}",
        spaces_client.bucket_name()
    );

    // Initialize Media Service with the URL template derived from config
    let url_template: Arc<dyn UrlTemplate> = Arc::from(template_from_config(&config.storage));
    let media_service = Arc::new(MediaService::new(
        pool.clone(),
        Arc::clone(&spaces_client),
        url_template,
    ));
    tracing::info!("Media service initialized");

    // Initialize Category Service
    let category_service = Arc::new(CategoryService::new(pool.clone()));
    tracing::info!("Category service initialized");

    // Initialize Tag Service
    let tag_service = Arc::new(TagService::new(pool.clone()));
    tracing::info!("Tag service initialized");

    // Initialize Job Service
    let job_service = Arc::new(JobService::new(
        pool.clone(),
        Arc::clone(&spaces_client),
        config.jobs.media_retention_days,
    ));
    tracing::info!("Job service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    let users_state = UsersState {
        users: Arc::clone(&user_service),
        tokens: Arc::clone(&token_service),
    };

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(users_routes::protected_routes(users_state.clone()))
        .merge(media_routes::protected_routes(Arc::clone(&media_service)))
        .merge(categories_routes::protected_routes(Arc::clone(
            &category_service,
        )))
        .merge(tags_routes::protected_routes(Arc::clone(&tag_service)))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&token_service),
            middleware::auth_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(users_routes::public_routes(users_state))
        .merge(media_routes::public_routes(Arc::clone(&media_service)))
        .merge(categories_routes::public_routes(category_service))
        .merge(tags_routes::public_routes(tag_service))
        .merge(jobs_routes::routes(JobsState {
            jobs: job_service,
            tokens: Arc::clone(&token_service),
            cron_secret: config.jobs.cron_secret.clone(),
        }));

    let app = Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
