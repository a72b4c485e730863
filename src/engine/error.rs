//! Engine error taxonomy.

use crate::api::ClassId;
use crate::db::RepositoryError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures an engine operation can report to its caller.
///
/// Generation failures always occur before the final persist, so a failed run
/// never leaves a partial schedule behind. "No conflicts found" is not an
/// error anywhere — validation and resolution return empty results instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A class, schedule or teacher id did not resolve.
    #[error("{0}")]
    NotFound(String),

    /// A request parameter was outside its documented range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The class has zero teacher/subject assignment rows; generation cannot
    /// proceed without at least one.
    #[error("No teacher assignments found for class {0}")]
    NoAssignments(ClassId),

    /// The run was cancelled cooperatively before the final commit.
    #[error("Generation cancelled before completion")]
    Cancelled,

    /// Opaque failure from the storage collaborator, not interpreted.
    #[error("Persistence failure: {0}")]
    Persistence(RepositoryError),
}

impl EngineError {
    /// Convert a repository error, promoting `NotFound` into the engine's own
    /// not-found class so callers can map it to a 404 without string matching.
    pub fn from_repo(err: RepositoryError) -> Self {
        if err.is_not_found() {
            EngineError::NotFound(err.to_string())
        } else {
            EngineError::Persistence(err)
        }
    }
}

impl From<RepositoryError> for EngineError {
    fn from(err: RepositoryError) -> Self {
        EngineError::from_repo(err)
    }
}
