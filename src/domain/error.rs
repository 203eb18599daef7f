//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::NodeKind;
use crate::domain::ids::NodeId;

/// Domain errors describe requests that cannot be applied to the tree.
/// The snapshot the request was made against is never modified.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: NodeKind, id: NodeId },

    #[error("module {module} does not belong to course {course}")]
    ModuleNotInCourse { course: NodeId, module: NodeId },

    #[error("resources cannot be dragged across courses ({from} -> {to})")]
    CrossCourseMove { from: NodeId, to: NodeId },

    #[error("a {kind} cannot be dropped into {container}")]
    ContainerMismatch { kind: NodeKind, container: String },

    #[error("malformed droppable id: {0}")]
    MalformedDroppable(String),

    #[error("unknown {what}: {value}")]
    UnknownKind { what: &'static str, value: String },
}

impl DomainError {
    /// True for errors caused by an id that does not resolve where expected.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::NotFound { .. } | DomainError::ModuleNotInCourse { .. }
        )
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
