//! Storage module for timetable data.
//!
//! The engine depends only on the [`TimetableRepository`] trait; concrete
//! backends live in `repositories`. The relational store of the surrounding
//! school-administration system is an external collaborator — in this crate
//! the in-memory [`LocalRepository`] serves tests, development, and the
//! default server configuration.
//!
//! # Recommended Usage
//!
//! ```ignore
//! use timetable_rust::db::{RepositoryFactory, RepositoryType};
//! use timetable_rust::engine::TimetableEngine;
//!
//! let repo = RepositoryFactory::create(RepositoryType::Local);
//! let engine = TimetableEngine::new(repo, Default::default());
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
#[cfg(feature = "local-repo")]
pub use repositories::LocalRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, TimetableRepository};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn TimetableRepository>> = OnceLock::new();

/// Initialize the global repository singleton for the selected backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo = RepositoryFactory::create(RepositoryType::Local);
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn TimetableRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
