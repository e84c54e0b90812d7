use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::jobs::{handlers as jobs_handlers, services as jobs_services};
use crate::features::media::{dtos as media_dtos, handlers as media_handlers, models as media_models};
use crate::features::tags::{dtos as tags_dtos, handlers as tags_handlers};
use crate::features::users::{
    dtos as users_dtos, handlers as users_handlers, models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Users
        users_handlers::login,
        users_handlers::get_me,
        users_handlers::create_user,
        users_handlers::get_user,
        users_handlers::list_users,
        // Media
        media_handlers::upload_media,
        media_handlers::get_media,
        media_handlers::list_media,
        media_handlers::update_media,
        media_handlers::delete_media,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::delete_category,
        // Tags
        tags_handlers::list_tags,
        tags_handlers::create_tag,
        tags_handlers::delete_tag,
        // Jobs
        jobs_handlers::run_jobs,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Users
            users_models::AuthenticatedUser,
            users_dtos::LoginDto,
            users_dtos::LoginResponseDto,
            users_dtos::CreateUserDto,
            users_dtos::UserResponseDto,
            ApiResponse<users_dtos::LoginResponseDto>,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Media
            media_models::MediaVariant,
            media_dtos::UploadMediaDto,
            media_dtos::UpdateMediaDto,
            media_dtos::MediaResponseDto,
            ApiResponse<media_dtos::MediaResponseDto>,
            ApiResponse<Vec<media_dtos::MediaResponseDto>>,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::CategoryResponseDto,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            // Tags
            tags_dtos::CreateTagDto,
            tags_dtos::TagResponseDto,
            ApiResponse<tags_dtos::TagResponseDto>,
            ApiResponse<Vec<tags_dtos::TagResponseDto>>,
            // Jobs
            jobs_services::JobRunReport,
            ApiResponse<jobs_services::JobRunReport>,
        )
    ),
    tags(
        (name = "users", description = "User accounts and authentication"),
        (name = "media", description = "Media uploads and image variants"),
        (name = "categories", description = "Editorial categories"),
        (name = "tags", description = "Editorial tags"),
        (name = "jobs", description = "Scheduled maintenance"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Newsroom API",
        version = "0.1.0",
        description = "API documentation for the Newsroom backend",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
