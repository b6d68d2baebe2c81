//! PostgreSQL implementation of the libros repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{query, LibrosRepository};
use crate::{
    error::{AppError, AppResult},
    models::{Libro, LibroFilter, LibroInput, LibroPatch},
};

#[derive(Clone)]
pub struct PgLibrosRepository {
    pool: Pool<Postgres>,
}

impl PgLibrosRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Libro {} not found", id))
}

#[async_trait]
impl LibrosRepository for PgLibrosRepository {
    async fn list(&self, filter: &LibroFilter) -> AppResult<Vec<Libro>> {
        let stmt = query::select_filtered(filter);
        tracing::debug!(sql = %stmt.sql, args = ?stmt.args, "Listing libros");

        let rows = stmt.query_as::<Libro>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Libro> {
        sqlx::query_as::<_, Libro>("SELECT id, titulo, autor, ano FROM libros WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn create(&self, input: &LibroInput) -> AppResult<Libro> {
        let row = sqlx::query_as::<_, Libro>(
            r#"
            INSERT INTO libros (titulo, autor, ano)
            VALUES ($1, $2, $3)
            RETURNING id, titulo, autor, ano
            "#,
        )
        .bind(&input.titulo)
        .bind(&input.autor)
        .bind(input.ano)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, input: &LibroInput) -> AppResult<Libro> {
        sqlx::query_as::<_, Libro>(
            r#"
            UPDATE libros
            SET titulo = $1, autor = $2, ano = $3
            WHERE id = $4
            RETURNING id, titulo, autor, ano
            "#,
        )
        .bind(&input.titulo)
        .bind(&input.autor)
        .bind(input.ano)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found(id))
    }

    async fn patch(&self, id: i32, patch: &LibroPatch) -> AppResult<Libro> {
        let Some(stmt) = query::update_partial(id, patch) else {
            // Nothing to SET: hand back the stored row
            return self.get_by_id(id).await;
        };
        tracing::debug!(sql = %stmt.sql, args = ?stmt.args, "Patching libro");

        stmt.query_as::<Libro>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM libros WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
