//! The concept arena.
//!
//! Concepts live in a dense vector and refer to each other through
//! [`ConceptId`] indices. A slot stores the id of its child, so two parents
//! that share a child observe every update made to that child's slots.

mod variable;
mod walk;

pub use variable::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{GraphError, Result};

/// Stable index of a concept inside its [`ConceptGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConceptId(pub usize);

impl std::fmt::Display for ConceptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named edge from a concept to an optional child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub value: Option<ConceptId>,
}

/// A named node with ordered, uniquely named slots.
///
/// Slot order is kept for display only; equality compares slots by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    name: String,
    slots: Vec<Slot>,
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.slots.len() == other.slots.len()
            && self
                .slots
                .iter()
                .all(|slot| other.slot(&slot.name).is_some_and(|o| o.value == slot.value))
    }
}

impl Eq for Concept {}

impl Concept {
    /// The head name of this concept.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All slots in insertion order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Look up a slot by name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Whether the name carries the variable marker.
    pub fn is_placeholder(&self) -> bool {
        self.name.starts_with(VARIABLE_MARKER)
    }
}

/// Arena holding every concept built during a processing run.
#[derive(Debug, Clone, Default)]
pub struct ConceptGraph {
    concepts: Vec<Concept>,

    /// One shared placeholder node per variable id.
    variables: HashMap<VarId, ConceptId>,

    /// Variable id -> the concept it was bound to.
    bindings: HashMap<VarId, ConceptId>,
}

impl ConceptGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of concepts in the arena.
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    /// Add a concept with no slots.
    pub fn add(&mut self, name: impl Into<String>) -> ConceptId {
        self.push(Concept {
            name: name.into(),
            slots: Vec::new(),
        })
    }

    /// Add a concept with the given slots. A repeated slot name keeps the last value.
    pub fn concept<'a, I>(&mut self, name: impl Into<String>, slots: I) -> ConceptId
    where
        I: IntoIterator<Item = (&'a str, ConceptId)>,
    {
        let mut concept = Concept {
            name: name.into(),
            slots: Vec::new(),
        };
        for (slot, value) in slots {
            match concept.slots.iter_mut().find(|s| s.name == slot) {
                Some(existing) => existing.value = Some(value),
                None => concept.slots.push(Slot {
                    name: slot.to_string(),
                    value: Some(value),
                }),
            }
        }
        self.push(concept)
    }

    fn push(&mut self, concept: Concept) -> ConceptId {
        let id = ConceptId(self.concepts.len());
        self.concepts.push(concept);
        id
    }

    /// Get a concept by id.
    pub fn get(&self, id: ConceptId) -> Option<&Concept> {
        self.concepts.get(id.0)
    }

    /// Check if the id belongs to this graph.
    pub fn contains(&self, id: ConceptId) -> bool {
        id.0 < self.concepts.len()
    }

    /// Raw name of a concept, without following variable bindings.
    pub fn name(&self, id: ConceptId) -> Option<&str> {
        self.get(id).map(Concept::name)
    }

    /// Slots of a concept; empty for unknown ids.
    pub fn slots(&self, id: ConceptId) -> &[Slot] {
        self.get(id).map(Concept::slots).unwrap_or(&[])
    }

    /// The raw child stored in a slot, which may be an unbound variable.
    pub fn slot_ref(&self, id: ConceptId, slot: &str) -> Option<ConceptId> {
        self.get(id)?.slot(slot)?.value
    }

    /// Set or replace a slot value.
    ///
    /// An existing slot is updated in place, so any holder of `id` sees the
    /// new value. This is how co-referenced roles in sibling concepts stay
    /// in sync.
    pub fn set_value(&mut self, id: ConceptId, slot: &str, value: ConceptId) -> Result<()> {
        if !self.contains(value) {
            return Err(GraphError::UnknownConcept(value));
        }
        if id == value {
            return Err(GraphError::SelfLink {
                concept: id,
                slot: slot.to_string(),
            });
        }
        let concept = self
            .concepts
            .get_mut(id.0)
            .ok_or(GraphError::UnknownConcept(id))?;

        match concept.slots.iter_mut().find(|s| s.name == slot) {
            Some(existing) => existing.value = Some(value),
            None => concept.slots.push(Slot {
                name: slot.to_string(),
                value: Some(value),
            }),
        }
        Ok(())
    }

    /// Resolved value of a slot.
    ///
    /// Returns `None` when the slot is missing or still holds an unbound variable.
    pub fn value(&self, id: ConceptId, slot: &str) -> Option<ConceptId> {
        self.slot_ref(id, slot).and_then(|v| self.resolve(v))
    }

    /// Head name of a slot's resolved value.
    pub fn value_name(&self, id: ConceptId, slot: &str) -> Option<&str> {
        self.value(id, slot).and_then(|v| self.name(v))
    }

    /// Head name of a concept after following variable bindings.
    pub fn head(&self, id: ConceptId) -> Option<&str> {
        self.resolve(id).and_then(|r| self.name(r))
    }

    /// Check whether a concept resolves to the given head.
    pub fn has_head(&self, id: ConceptId, head: &str) -> bool {
        self.head(id) == Some(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_value_name() {
        let mut graph = ConceptGraph::new();
        let john = graph.add("John");
        let human = graph.concept("Human", [("firstName", john)]);

        assert_eq!(graph.value(human, "firstName"), Some(john));
        assert_eq!(graph.value_name(human, "firstName"), Some("John"));
        assert_eq!(graph.value(human, "lastName"), None);
    }

    #[test]
    fn test_value_skips_unbound_variable() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(1));
        let human = graph.concept("Human", [("lastName", var)]);

        assert_eq!(graph.slot_ref(human, "lastName"), Some(var));
        assert_eq!(graph.value(human, "lastName"), None);
        assert_eq!(graph.value_name(human, "lastName"), None);
    }

    #[test]
    fn test_set_value_replaces_in_place() {
        let mut graph = ConceptGraph::new();
        let ball = graph.add("Ball");
        let box_ = graph.add("Box");
        let thing = graph.concept("PhysObj", [("type", ball)]);

        // Two parents share the same child concept.
        let grasp = graph.concept("GRASP", [("thing", thing)]);
        let propel = graph.concept("PROPEL", [("thing", thing)]);

        graph.set_value(thing, "type", box_).unwrap();

        assert_eq!(graph.slots(thing).len(), 1);
        let via_grasp = graph.value(grasp, "thing").unwrap();
        let via_propel = graph.value(propel, "thing").unwrap();
        assert_eq!(graph.value_name(via_grasp, "type"), Some("Box"));
        assert_eq!(graph.value_name(via_propel, "type"), Some("Box"));
    }

    #[test]
    fn test_set_value_appends_new_slot() {
        let mut graph = ConceptGraph::new();
        let human = graph.add("Human");
        let male = graph.add("Male");

        graph.set_value(human, "gender", male).unwrap();

        assert_eq!(graph.slots(human)[0].name, "gender");
        assert_eq!(graph.value_name(human, "gender"), Some("Male"));
    }

    #[test]
    fn test_self_link_rejected() {
        let mut graph = ConceptGraph::new();
        let quantity = graph.add("Quantity");

        let result = graph.set_value(quantity, "of", quantity);
        assert!(matches!(result, Err(GraphError::SelfLink { .. })));
        assert!(graph.slots(quantity).is_empty());
    }

    #[test]
    fn test_unknown_concept_rejected() {
        let mut graph = ConceptGraph::new();
        let human = graph.add("Human");

        let result = graph.set_value(human, "friend", ConceptId(99));
        assert_eq!(result, Err(GraphError::UnknownConcept(ConceptId(99))));
    }

    #[test]
    fn test_concept_equality_ignores_slot_order() {
        let mut graph = ConceptGraph::new();
        let a = graph.add("A");
        let b = graph.add("B");
        let x = graph.concept("H", [("first", a), ("second", b)]);
        let y = graph.concept("H", [("second", b), ("first", a)]);
        let z = graph.concept("H", [("first", b), ("second", a)]);

        assert_eq!(graph.get(x), graph.get(y));
        assert_ne!(graph.get(x), graph.get(z));
    }

    #[test]
    fn test_concept_builder_keeps_last_duplicate() {
        let mut graph = ConceptGraph::new();
        let a = graph.add("A");
        let b = graph.add("B");
        let c = graph.concept("C", [("x", a), ("x", b)]);

        assert_eq!(graph.slots(c).len(), 1);
        assert_eq!(graph.value(c, "x"), Some(b));
    }
}
