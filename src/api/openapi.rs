//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, libros};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libros API",
        version = "0.1.0",
        description = "Book catalog REST API"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Libros
        libros::list_libros,
        libros::get_libro,
        libros::create_libro,
        libros::update_libro,
        libros::patch_libro,
        libros::delete_libro,
    ),
    components(
        schemas(
            crate::models::Libro,
            crate::models::LibroInput,
            crate::models::LibroPatch,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "libros", description = "Book catalog management")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
