//! Libros catalog service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::AppResult,
    models::{Libro, LibroFilter, LibroInput, LibroPatch},
    repository::LibrosRepository,
};

#[derive(Clone)]
pub struct LibrosService {
    repository: Arc<dyn LibrosRepository>,
}

impl LibrosService {
    pub fn new(repository: Arc<dyn LibrosRepository>) -> Self {
        Self { repository }
    }

    /// List books matching the filter
    pub async fn list(&self, filter: &LibroFilter) -> AppResult<Vec<Libro>> {
        filter.validate()?;
        self.repository.list(filter).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Libro> {
        self.repository.get_by_id(id).await
    }

    /// Create a book
    pub async fn create(&self, input: &LibroInput) -> AppResult<Libro> {
        input.validate()?;
        let libro = self.repository.create(input).await?;
        tracing::info!(id = libro.id, "Libro created");
        Ok(libro)
    }

    /// Replace every field of a book
    pub async fn update(&self, id: i32, input: &LibroInput) -> AppResult<Libro> {
        input.validate()?;
        let libro = self.repository.update(id, input).await?;
        tracing::info!(id, "Libro updated");
        Ok(libro)
    }

    /// Change only the fields that were sent
    pub async fn patch(&self, id: i32, patch: &LibroPatch) -> AppResult<Libro> {
        patch.validate()?;
        let libro = self.repository.patch(id, patch).await?;
        if !patch.is_empty() {
            tracing::info!(id, "Libro patched");
        }
        Ok(libro)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.delete(id).await?;
        tracing::info!(id, "Libro deleted");
        Ok(())
    }

    /// Storage connectivity check (readiness probe)
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
