//! Factory for creating repository instances.

use std::sync::Arc;

use super::repository::TimetableRepository;

/// Available repository backends.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory backend for testing and local development.
    Local,
}

/// Factory that creates repository instances by backend type.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create an in-memory repository.
    #[cfg(feature = "local-repo")]
    pub fn create_local() -> Arc<dyn TimetableRepository> {
        Arc::new(super::repositories::LocalRepository::new())
    }

    /// Create a repository of the requested type.
    pub fn create(repository_type: RepositoryType) -> Arc<dyn TimetableRepository> {
        match repository_type {
            #[cfg(feature = "local-repo")]
            RepositoryType::Local => Self::create_local(),
        }
    }
}
