//! Builder errors

use thiserror::Error;
use trellis_dom::DomError;

/// Errors surfaced while realizing a descriptor tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Underlying DOM operation failed
    #[error(transparent)]
    Dom(#[from] DomError),
    /// A pre-built node was used against a document that does not contain it
    #[error("node does not belong to this document")]
    ForeignNode,
}
