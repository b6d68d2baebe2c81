//! Data models for the libros catalog

pub mod libro;
pub mod presence;

pub use libro::{Libro, LibroFilter, LibroInput, LibroPatch, ListParams};
pub use presence::Presence;
