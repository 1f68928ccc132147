//! Owned snapshots of concepts.
//!
//! A [`ConceptTree`] is detached from its arena: it can be compared across
//! processing runs, printed, and serialized. Slot order is kept for display
//! but ignored by equality.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::graph::{ConceptGraph, ConceptId};

/// A concept expanded into an owned tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptTree {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<TreeSlot>,
}

/// A slot of a [`ConceptTree`]. `None` marks a role that was never filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSlot {
    pub name: String,
    pub value: Option<ConceptTree>,
}

impl ConceptTree {
    /// A tree with no slots.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: Vec::new(),
        }
    }

    /// Add a filled slot.
    pub fn with_slot(mut self, name: impl Into<String>, value: ConceptTree) -> Self {
        self.slots.push(TreeSlot {
            name: name.into(),
            value: Some(value),
        });
        self
    }

    /// Add an unfilled slot.
    pub fn with_unbound(mut self, name: impl Into<String>) -> Self {
        self.slots.push(TreeSlot {
            name: name.into(),
            value: None,
        });
        self
    }

    /// Check if a slot exists, filled or not.
    pub fn has_slot(&self, name: &str) -> bool {
        self.slots.iter().any(|s| s.name == name)
    }

    /// The filled value of a slot.
    pub fn slot(&self, name: &str) -> Option<&ConceptTree> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.value.as_ref())
    }

    /// Follow a dotted slot path such as `actor.firstName`.
    pub fn path(&self, path: &str) -> Option<&ConceptTree> {
        path.split('.')
            .filter(|p| !p.is_empty())
            .try_fold(self, |tree, name| tree.slot(name))
    }

    /// Head name reached by a dotted slot path.
    pub fn path_name(&self, path: &str) -> Option<&str> {
        self.path(path).map(|t| t.name.as_str())
    }

    /// Count of slots left unfilled anywhere in the tree.
    pub fn unbound_count(&self) -> usize {
        self.slots
            .iter()
            .map(|s| match &s.value {
                Some(tree) => tree.unbound_count(),
                None => 1,
            })
            .sum()
    }
}

impl PartialEq for ConceptTree {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.slots.len() == other.slots.len()
            && self.slots.iter().all(|slot| {
                other
                    .slots
                    .iter()
                    .find(|o| o.name == slot.name)
                    .is_some_and(|o| o.value == slot.value)
            })
    }
}

impl std::fmt::Display for ConceptTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "\"\"")?;
        } else {
            write!(f, "{}", self.name)?;
        }
        if self.slots.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match &slot.value {
                Some(value) => write!(f, "{}: {}", slot.name, value)?,
                None => write!(f, "{}: ?", slot.name)?,
            }
        }
        write!(f, ")")
    }
}

impl ConceptGraph {
    /// Expand a concept into an owned tree.
    ///
    /// Bound variables are followed; unbound ones become `None` slots. An
    /// unbound root is rendered under its placeholder name. A slot pointing
    /// back at one of its ancestors is rendered as unfilled.
    pub fn snapshot(&self, id: ConceptId) -> Option<ConceptTree> {
        if !self.contains(id) {
            return None;
        }
        let mut ancestors = HashSet::new();
        match self.resolve(id) {
            Some(resolved) => Some(self.expand(resolved, &mut ancestors)),
            None => self.name(id).map(ConceptTree::leaf),
        }
    }

    fn expand(&self, id: ConceptId, ancestors: &mut HashSet<ConceptId>) -> ConceptTree {
        ancestors.insert(id);
        let mut tree = ConceptTree::leaf(self.name(id).unwrap_or_default());
        for slot in self.slots(id) {
            let value = slot
                .value
                .and_then(|v| self.resolve(v))
                .filter(|child| !ancestors.contains(child))
                .map(|child| self.expand(child, ancestors));
            tree.slots.push(TreeSlot {
                name: slot.name.clone(),
                value,
            });
        }
        ancestors.remove(&id);
        tree
    }
}
