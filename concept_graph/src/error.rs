//! Errors raised when a graph would be built in a structurally invalid way.

use thiserror::Error;

use crate::graph::{ConceptId, VarId};

/// Structural misuse of a [`ConceptGraph`](crate::ConceptGraph).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A concept was linked as the value of one of its own slots.
    #[error("concept {concept} cannot fill its own slot `{slot}`")]
    SelfLink { concept: ConceptId, slot: String },

    /// Binding would make a variable resolve to itself.
    #[error("variable {0} cannot be bound to itself")]
    SelfReferentialVariable(VarId),

    /// The id does not belong to this graph.
    #[error("unknown concept {0}")]
    UnknownConcept(ConceptId),
}

pub type Result<T> = std::result::Result<T, GraphError>;
