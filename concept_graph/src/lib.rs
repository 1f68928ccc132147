//! # Concept Graph
//!
//! The value layer of the word-expert interpreter: conceptual dependency
//! concepts, their slots, and the variables that stand in for roles a parser
//! has not filled yet. This crate contains no parsing logic.
//!
//! ## Core Components
//!
//! - **graph**: Arena of concepts addressed by [`ConceptId`], variable binding and walks
//! - **tree**: Owned snapshots of a concept for comparison, display and serialization
//! - **pattern**: Open-world structural matchers over resolved concepts

pub mod error;
pub mod graph;
pub mod pattern;
pub mod tree;

pub use error::{GraphError, Result};
pub use graph::*;
pub use pattern::*;
pub use tree::*;
