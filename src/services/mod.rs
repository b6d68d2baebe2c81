//! Business logic services

pub mod libros;

use std::sync::Arc;

use crate::repository::LibrosRepository;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub libros: libros::LibrosService,
}

impl Services {
    /// Create all services on top of the given repository
    pub fn new(repository: Arc<dyn LibrosRepository>) -> Self {
        Self {
            libros: libros::LibrosService::new(repository),
        }
    }
}
