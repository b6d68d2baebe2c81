//! Libros (book catalog) endpoints

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

use super::{JsonBody, LibroId};
use crate::{
    error::{AppError, AppResult},
    models::{Libro, LibroFilter, LibroInput, LibroPatch, ListParams},
    AppState,
};

pub const COLLECTION_METHODS: &str = "GET, POST";
pub const ITEM_METHODS: &str = "GET, PUT, PATCH, DELETE";

/// List books with optional author and year filters
#[utoipa::path(
    get,
    path = "/libros",
    tag = "libros",
    params(ListParams),
    responses(
        (status = 200, description = "Matching books ordered by id", body = Vec<Libro>),
        (status = 400, description = "Invalid query parameter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_libros(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Vec<Libro>>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let filter = LibroFilter::from_params(&params, state.config.api.default_limit)?;

    let libros = state.services.libros.list(&filter).await?;
    Ok(Json(libros))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Libro ID")),
    responses(
        (status = 200, description = "Book details", body = Libro),
        (status = 400, description = "Invalid id", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_libro(
    State(state): State<AppState>,
    LibroId(id): LibroId,
) -> AppResult<Json<Libro>> {
    let libro = state.services.libros.get_by_id(id).await?;
    Ok(Json(libro))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/libros",
    tag = "libros",
    request_body = LibroInput,
    responses(
        (status = 201, description = "Book created", body = Libro),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_libro(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LibroInput>,
) -> AppResult<(StatusCode, Json<Libro>)> {
    let libro = state.services.libros.create(&input).await?;
    Ok((StatusCode::CREATED, Json(libro)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Libro ID")),
    request_body = LibroInput,
    responses(
        (status = 200, description = "Book updated", body = Libro),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_libro(
    State(state): State<AppState>,
    LibroId(id): LibroId,
    JsonBody(input): JsonBody<LibroInput>,
) -> AppResult<Json<Libro>> {
    let libro = state.services.libros.update(id, &input).await?;
    Ok(Json(libro))
}

/// Partially update a book. Fields left out of the body keep their value.
#[utoipa::path(
    patch,
    path = "/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Libro ID")),
    request_body = LibroPatch,
    responses(
        (status = 200, description = "Book after the update", body = Libro),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn patch_libro(
    State(state): State<AppState>,
    LibroId(id): LibroId,
    JsonBody(patch): JsonBody<LibroPatch>,
) -> AppResult<Json<Libro>> {
    let libro = state.services.libros.patch(id, &patch).await?;
    Ok(Json(libro))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/libros/{id}",
    tag = "libros",
    params(("id" = i32, Path, description = "Libro ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_libro(
    State(state): State<AppState>,
    LibroId(id): LibroId,
) -> AppResult<StatusCode> {
    state.services.libros.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn collection_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed {
        allow: COLLECTION_METHODS,
    }
}

pub async fn item_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed {
        allow: ITEM_METHODS,
    }
}
