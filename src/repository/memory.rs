//! In-memory libros repository.
//!
//! Mirrors the PostgreSQL repository's behavior, including the NotFound
//! errors, so handlers and services can be exercised without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::LibrosRepository;
use crate::{
    error::{AppError, AppResult},
    models::{Libro, LibroFilter, LibroInput, LibroPatch},
};

#[derive(Debug, Default)]
struct Store {
    libros: BTreeMap<i32, Libro>,
    last_id: i32,
}

#[derive(Debug, Default)]
pub struct InMemoryLibrosRepository {
    store: RwLock<Store>,
}

impl InMemoryLibrosRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with the given books, ids assigned in order
    pub fn with_libros(inputs: impl IntoIterator<Item = LibroInput>) -> Self {
        let mut store = Store::default();
        for input in inputs {
            store.insert(&input);
        }
        Self {
            store: RwLock::new(store),
        }
    }
}

impl Store {
    fn insert(&mut self, input: &LibroInput) -> Libro {
        // Ids are never reused, even after a delete
        self.last_id += 1;
        let libro = Libro {
            id: self.last_id,
            titulo: input.titulo.clone(),
            autor: input.autor.clone(),
            ano: input.ano,
        };
        self.libros.insert(libro.id, libro.clone());
        libro
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Libro {} not found", id))
}

fn matches_filter(libro: &Libro, filter: &LibroFilter) -> bool {
    if let Some(author) = &filter.author {
        if !libro.autor.to_lowercase().contains(&author.to_lowercase()) {
            return false;
        }
    }
    if filter.year_from.is_some_and(|from| libro.ano < from) {
        return false;
    }
    if filter.year_to.is_some_and(|to| libro.ano > to) {
        return false;
    }
    true
}

#[async_trait]
impl LibrosRepository for InMemoryLibrosRepository {
    async fn list(&self, filter: &LibroFilter) -> AppResult<Vec<Libro>> {
        let store = self.store.read().await;
        let offset = usize::try_from(filter.offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit.max(0)).unwrap_or(usize::MAX);

        Ok(store
            .libros
            .values()
            .filter(|libro| matches_filter(libro, filter))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Libro> {
        let store = self.store.read().await;
        store.libros.get(&id).cloned().ok_or_else(|| not_found(id))
    }

    async fn create(&self, input: &LibroInput) -> AppResult<Libro> {
        let mut store = self.store.write().await;
        Ok(store.insert(input))
    }

    async fn update(&self, id: i32, input: &LibroInput) -> AppResult<Libro> {
        let mut store = self.store.write().await;
        let libro = store.libros.get_mut(&id).ok_or_else(|| not_found(id))?;
        libro.titulo = input.titulo.clone();
        libro.autor = input.autor.clone();
        libro.ano = input.ano;
        Ok(libro.clone())
    }

    async fn patch(&self, id: i32, patch: &LibroPatch) -> AppResult<Libro> {
        let mut store = self.store.write().await;
        let libro = store.libros.get_mut(&id).ok_or_else(|| not_found(id))?;
        patch.apply_to(libro);
        Ok(libro.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut store = self.store.write().await;
        store.libros.remove(&id).map(|_| ()).ok_or_else(|| not_found(id))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
