use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
    pub storage: StorageConfig,
    pub jobs: JobsConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Local JWT authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify access tokens
    pub secret: String,
    pub token_expiry: Duration,
    pub leeway: Duration,
    /// Email for the admin account seeded into an empty user table
    pub initial_admin_email: Option<String>,
    /// Password for the seeded admin account
    pub initial_admin_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Object storage configuration for the media library.
///
/// Points at DigitalOcean Spaces by default but works against any
/// S3-compatible endpoint. `public_domain`, when set, switches media URL
/// resolution to a custom domain instead of the provider-generated
/// `https://{bucket}.{region}.digitaloceanspaces.com` form.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// S3-compatible API endpoint used for uploads and deletes
    pub endpoint: String,
    /// Access key for authentication
    pub access_key: String,
    /// Secret key for authentication
    pub secret_key: String,
    /// Bucket name holding media objects
    pub bucket: String,
    /// Storage region (e.g. "nyc3")
    pub region: String,
    /// Optional custom domain serving the bucket (e.g. "https://media.example.com")
    pub public_domain: Option<String>,
}

/// Scheduled-job runner configuration
#[derive(Debug, Clone)]
pub struct JobsConfig {
    /// Shared secret allowing external schedulers to trigger job runs
    pub cron_secret: Option<String>,
    /// Days a soft-deleted media document is kept before being purged
    pub media_retention_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            // Only error if it's not "file not found" - that's acceptable
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            jobs: JobsConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 7200; // 2 hours
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60; // 1 minute

    pub fn from_env() -> Result<Self, String> {
        let secret = env::var("APP_SECRET")
            .map_err(|_| "APP_SECRET environment variable is required".to_string())?;

        if secret.len() < 32 {
            return Err("APP_SECRET must be at least 32 characters".to_string());
        }

        let token_expiry_secs = env::var("JWT_EXPIRY_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_EXPIRY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_EXPIRY_SECS must be a valid number".to_string())?;

        let leeway_secs = env::var("JWT_LEEWAY")
            .unwrap_or_else(|_| Self::DEFAULT_JWT_LEEWAY_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "JWT_LEEWAY must be a valid number".to_string())?;

        // Only seed an initial admin when both values are non-empty
        let initial_admin_email = env::var("INITIAL_ADMIN_EMAIL")
            .ok()
            .filter(|s| !s.is_empty());
        let initial_admin_password = env::var("INITIAL_ADMIN_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            secret,
            token_expiry: Duration::from_secs(token_expiry_secs),
            leeway: Duration::from_secs(leeway_secs),
            initial_admin_email,
            initial_admin_password,
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Newsroom API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Content management API for the newsroom".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let bucket = env::var("S3_BUCKET").map_err(|_| "S3_BUCKET must be set".to_string())?;

        let region = env::var("S3_REGION").map_err(|_| "S3_REGION must be set".to_string())?;

        // API endpoint defaults to the region's Spaces origin
        let endpoint = env::var("S3_ENDPOINT")
            .unwrap_or_else(|_| format!("https://{}.digitaloceanspaces.com", region));

        let access_key =
            env::var("S3_ACCESS_KEY_ID").map_err(|_| "S3_ACCESS_KEY_ID must be set".to_string())?;

        let secret_key = env::var("S3_SECRET_ACCESS_KEY")
            .map_err(|_| "S3_SECRET_ACCESS_KEY must be set".to_string())?;

        let public_domain = env::var("MEDIA_PUBLIC_DOMAIN")
            .ok()
            .filter(|s| !s.is_empty());

        Ok(Self {
            endpoint,
            access_key,
            secret_key,
            bucket,
            region,
            public_domain,
        })
    }
}

impl JobsConfig {
    const DEFAULT_MEDIA_RETENTION_DAYS: i64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let cron_secret = env::var("CRON_SECRET").ok().filter(|s| !s.is_empty());

        let media_retention_days = env::var("MEDIA_RETENTION_DAYS")
            .unwrap_or_else(|_| Self::DEFAULT_MEDIA_RETENTION_DAYS.to_string())
            .parse::<i64>()
            .map_err(|_| "MEDIA_RETENTION_DAYS must be a valid number".to_string())?;

        Ok(Self {
            cron_secret,
            media_retention_days,
        })
    }
}
