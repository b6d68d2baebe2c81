//! API handlers for the libros REST endpoints

pub mod health;
pub mod libros;
pub mod openapi;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    routing::{get, MethodRouter},
    Router,
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;

use crate::{error::AppError, AppState};

/// JSON request body.
///
/// Unlike `axum::Json`, every failure (unreadable body, malformed JSON,
/// wrong types, missing or unknown fields) is reported as a JSON 400, and
/// no `Content-Type` header is required.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {}", e)))
    }
}

/// Numeric `{id}` path segment. A missing segment (`/libros/`) is a bad id.
pub struct LibroId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for LibroId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let raw = Path::<String>::from_request_parts(parts, state)
            .await
            .map(|Path(raw)| raw)
            .unwrap_or_default();

        raw.parse::<i32>()
            .map(LibroId)
            .map_err(|_| AppError::BadRequest(format!("Invalid id: {}", raw)))
    }
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

fn item_routes() -> MethodRouter<AppState> {
    get(libros::get_libro)
        .put(libros::update_libro)
        .patch(libros::patch_libro)
        .delete(libros::delete_libro)
        .fallback(libros::item_method_not_allowed)
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Libros
        .route(
            "/libros",
            get(libros::list_libros)
                .post(libros::create_libro)
                .fallback(libros::collection_method_not_allowed),
        )
        .route("/libros/:id", item_routes())
        // Empty id segment
        .route("/libros/", item_routes())
        .fallback(route_not_found)
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
}
