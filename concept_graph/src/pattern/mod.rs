//! Structural patterns over resolved concepts.
//!
//! Patterns are open-world: only the head and the slots a pattern names are
//! checked, everything else on the concept is ignored.

use serde::{Deserialize, Serialize};

use crate::graph::{ConceptGraph, ConceptId};

/// A structural matcher for concepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    head: Option<String>,
    slots: Vec<(String, Pattern)>,
}

impl Pattern {
    /// Matches any resolved concept.
    pub fn any() -> Self {
        Self::default()
    }

    /// Matches concepts with the given head.
    pub fn head(name: impl Into<String>) -> Self {
        Self {
            head: Some(name.into()),
            slots: Vec::new(),
        }
    }

    /// Require a slot whose resolved value matches `pattern`.
    pub fn with_slot(mut self, slot: impl Into<String>, pattern: Pattern) -> Self {
        self.slots.push((slot.into(), pattern));
        self
    }

    /// Require a slot whose resolved value has the given head.
    pub fn with_value(self, slot: impl Into<String>, head: impl Into<String>) -> Self {
        self.with_slot(slot, Pattern::head(head))
    }

    /// Require a slot to be filled with anything.
    pub fn with_bound(self, slot: impl Into<String>) -> Self {
        self.with_slot(slot, Pattern::any())
    }

    /// The head this pattern requires, if any.
    pub fn required_head(&self) -> Option<&str> {
        self.head.as_deref()
    }

    /// Check a concept against the pattern. Unbound variables never match.
    pub fn matches(&self, graph: &ConceptGraph, id: ConceptId) -> bool {
        let Some(id) = graph.resolve(id) else {
            return false;
        };
        if let Some(head) = &self.head {
            if graph.name(id) != Some(head.as_str()) {
                return false;
            }
        }
        self.slots.iter().all(|(slot, pattern)| {
            graph
                .value(id, slot)
                .is_some_and(|child| pattern.matches(graph, child))
        })
    }
}
