//! Libro (book) model and request shapes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError, ValidationErrors};

use super::presence::Presence;
use crate::error::{AppError, AppResult};

/// Page size when the caller does not send `limit`
pub const DEFAULT_LIMIT: i64 = 50;

/// Persisted book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Libro {
    /// Generated by storage, never changes
    pub id: i32,
    pub titulo: String,
    pub autor: String,
    /// Publication year
    pub ano: i32,
}

/// Full book payload used by create (POST) and replace (PUT)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LibroInput {
    #[validate(custom(function = "not_blank"))]
    pub titulo: String,
    #[validate(custom(function = "not_blank"))]
    pub autor: String,
    #[validate(range(min = 1, message = "ano must be a positive integer"))]
    pub ano: i32,
}

/// Partial update payload. Only the fields that were sent are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LibroPatch {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub titulo: Presence<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub autor: Presence<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub ano: Presence<i32>,
}

impl LibroPatch {
    /// True when no field was sent
    pub fn is_empty(&self) -> bool {
        self.titulo.is_absent() && self.autor.is_absent() && self.ano.is_absent()
    }

    /// Apply the present fields on top of an existing book
    pub fn apply_to(&self, libro: &mut Libro) {
        if let Presence::Present(titulo) = &self.titulo {
            libro.titulo = titulo.clone();
        }
        if let Presence::Present(autor) = &self.autor {
            libro.autor = autor.clone();
        }
        if let Presence::Present(ano) = self.ano {
            libro.ano = ano;
        }
    }
}

impl Validate for LibroPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Presence::Present(titulo) = &self.titulo {
            if let Err(e) = not_blank(titulo) {
                errors.add("titulo", e);
            }
        }
        if let Presence::Present(autor) = &self.autor {
            if let Err(e) = not_blank(autor) {
                errors.add("autor", e);
            }
        }
        if let Presence::Present(ano) = self.ano {
            if ano <= 0 {
                errors.add("ano", message_error("range", "ano must be a positive integer"));
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Raw `GET /libros` query string. Numbers stay strings until
/// [`LibroFilter::from_params`] so that a bad value becomes a JSON 400.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive substring of the author
    #[serde(alias = "autor")]
    pub author: Option<String>,
    /// Lowest publication year (inclusive)
    #[serde(rename = "yearFrom", alias = "from")]
    pub year_from: Option<String>,
    /// Highest publication year (inclusive)
    #[serde(rename = "yearTo", alias = "to")]
    pub year_to: Option<String>,
    /// Page size (default 50)
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Typed list filter handed to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibroFilter {
    pub author: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub limit: i64,
    pub offset: i64,
}

impl Default for LibroFilter {
    fn default() -> Self {
        Self {
            author: None,
            year_from: None,
            year_to: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl LibroFilter {
    /// Parse the raw query string. Empty values count as not sent.
    pub fn from_params(params: &ListParams, default_limit: i64) -> AppResult<Self> {
        Ok(Self {
            author: non_empty(&params.author).map(str::to_string),
            year_from: parse_param(&params.year_from, "yearFrom")?,
            year_to: parse_param(&params.year_to, "yearTo")?,
            limit: parse_param(&params.limit, "limit")?.unwrap_or(default_limit),
            offset: parse_param(&params.offset, "offset")?.unwrap_or(0),
        })
    }
}

impl Validate for LibroFilter {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.limit < 0 {
            errors.add("limit", message_error("range", "limit must not be negative"));
        }
        if self.offset < 0 {
            errors.add("offset", message_error("range", "offset must not be negative"));
        }
        if let (Some(from), Some(to)) = (self.year_from, self.year_to) {
            if from > to {
                errors.add(
                    "yearFrom",
                    message_error("range", "yearFrom must not be greater than yearTo"),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_param<T: std::str::FromStr>(value: &Option<String>, name: &str) -> AppResult<Option<T>> {
    non_empty(value)
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|_| AppError::BadRequest(format!("{} must be an integer", name)))
        })
        .transpose()
}

/// Rejects strings that are empty once surrounding whitespace is removed
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn message_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}
