//! Builds the parameterized SELECT and UPDATE statements whose shape depends
//! on the request.
//!
//! Values never reach the SQL text: each one becomes a `$n` placeholder and is
//! pushed onto the argument list at index `n - 1`.

use sqlx::{
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    FromRow, Postgres,
};

use crate::models::{LibroFilter, LibroPatch, Presence};

pub const TABLE: &str = "libros";
pub const COLUMNS: &str = "id, titulo, autor, ano";

/// A bound value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Int(i32),
    BigInt(i64),
    Text(String),
}

/// One `column <op> $index` clause
#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    column: &'static str,
    operator: &'static str,
    index: usize,
}

/// Accumulates clauses and the arguments they reference
#[derive(Debug, Default)]
pub struct ClauseBuilder {
    bindings: Vec<Binding>,
    args: Vec<SqlValue>,
}

impl ClauseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an argument without a clause and return its placeholder number
    pub fn push_arg(&mut self, value: SqlValue) -> usize {
        self.args.push(value);
        self.args.len()
    }

    /// Push `column <operator> $n` with its argument
    pub fn push_clause(&mut self, column: &'static str, operator: &'static str, value: SqlValue) -> usize {
        let index = self.push_arg(value);
        self.bindings.push(Binding {
            column,
            operator,
            index,
        });
        index
    }

    pub fn has_clauses(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Render the clauses joined by `separator`
    pub fn render(&self, separator: &str) -> String {
        self.bindings
            .iter()
            .map(|b| format!("{} {} ${}", b.column, b.operator, b.index))
            .collect::<Vec<_>>()
            .join(separator)
    }

    pub fn into_args(self) -> Vec<SqlValue> {
        self.args
    }
}

/// Rendered SQL with positionally aligned arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl Statement {
    /// Build a sqlx query with every argument bound in order
    pub fn query_as<'q, O>(&'q self) -> QueryAs<'q, Postgres, O, PgArguments>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        self.args
            .iter()
            .fold(sqlx::query_as::<_, O>(&self.sql), |query, arg| match arg {
                SqlValue::Int(v) => query.bind(*v),
                SqlValue::BigInt(v) => query.bind(*v),
                SqlValue::Text(v) => query.bind(v.as_str()),
            })
    }
}

/// `SELECT ... WHERE 1=1 [AND autor ILIKE $n] [AND ano >= $n] [AND ano <= $n]
/// ORDER BY id LIMIT $n OFFSET $n`
pub fn select_filtered(filter: &LibroFilter) -> Statement {
    let mut builder = ClauseBuilder::new();

    if let Some(author) = &filter.author {
        builder.push_clause("autor", "ILIKE", SqlValue::Text(contains_pattern(author)));
    }
    if let Some(from) = filter.year_from {
        builder.push_clause("ano", ">=", SqlValue::Int(from));
    }
    if let Some(to) = filter.year_to {
        builder.push_clause("ano", "<=", SqlValue::Int(to));
    }

    let mut sql = format!("SELECT {} FROM {} WHERE 1=1", COLUMNS, TABLE);
    if builder.has_clauses() {
        sql.push_str(" AND ");
        sql.push_str(&builder.render(" AND "));
    }

    let limit = builder.push_arg(SqlValue::BigInt(filter.limit));
    let offset = builder.push_arg(SqlValue::BigInt(filter.offset));
    sql.push_str(&format!(" ORDER BY id LIMIT ${} OFFSET ${}", limit, offset));

    Statement {
        sql,
        args: builder.into_args(),
    }
}

/// `UPDATE libros SET <present fields> WHERE id = $n RETURNING ...`.
/// Returns `None` when the patch carries no field.
pub fn update_partial(id: i32, patch: &LibroPatch) -> Option<Statement> {
    let mut builder = ClauseBuilder::new();

    if let Presence::Present(titulo) = &patch.titulo {
        builder.push_clause("titulo", "=", SqlValue::Text(titulo.clone()));
    }
    if let Presence::Present(autor) = &patch.autor {
        builder.push_clause("autor", "=", SqlValue::Text(autor.clone()));
    }
    if let Presence::Present(ano) = patch.ano {
        builder.push_clause("ano", "=", SqlValue::Int(ano));
    }

    if !builder.has_clauses() {
        return None;
    }

    let set = builder.render(", ");
    let id_index = builder.push_arg(SqlValue::Int(id));

    Some(Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
            TABLE, set, id_index, COLUMNS
        ),
        args: builder.into_args(),
    })
}

/// `%needle%` with LIKE metacharacters escaped (backslash is the default
/// escape character in PostgreSQL)
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
