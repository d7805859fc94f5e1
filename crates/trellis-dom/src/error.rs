//! DOM operation errors

use thiserror::Error;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomError {
    /// Node not found
    #[error("node not found")]
    NotFound,
    /// Hierarchy error (e.g., inserting ancestor)
    #[error("hierarchy request error")]
    HierarchyRequest,
    /// Operation requires an element node
    #[error("node is not an element")]
    NotAnElement,
    /// Operation requires a text node
    #[error("node is not a text node")]
    NotAText,
}
