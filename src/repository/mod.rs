//! Repository layer for database operations

pub mod memory;
pub mod postgres;
pub mod query;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Libro, LibroFilter, LibroInput, LibroPatch},
};

pub use memory::InMemoryLibrosRepository;
pub use postgres::PgLibrosRepository;

/// Storage operations on the book catalog.
///
/// Every implementation reports a missing id as `AppError::NotFound` and
/// anything else that goes wrong in storage as a different variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LibrosRepository: Send + Sync {
    /// Books matching the filter, ordered by id
    async fn list(&self, filter: &LibroFilter) -> AppResult<Vec<Libro>>;

    async fn get_by_id(&self, id: i32) -> AppResult<Libro>;

    /// Insert a book and return it with its generated id
    async fn create(&self, input: &LibroInput) -> AppResult<Libro>;

    /// Replace every field of an existing book
    async fn update(&self, id: i32, input: &LibroInput) -> AppResult<Libro>;

    /// Change only the fields present in the patch. An empty patch returns
    /// the stored book untouched.
    async fn patch(&self, id: i32, patch: &LibroPatch) -> AppResult<Libro>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Check that storage is reachable
    async fn ping(&self) -> AppResult<()>;
}
