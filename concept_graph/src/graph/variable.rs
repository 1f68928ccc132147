//! Variables: placeholder concepts for roles that are not filled yet.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{Concept, ConceptGraph, ConceptId};
use crate::error::{GraphError, Result};

/// Prefix reserved for variable placeholder names.
pub const VARIABLE_MARKER: char = '?';

/// Identifier of a variable. Every slot built with the same id co-references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

impl VarId {
    /// Placeholder name encoding this id.
    pub fn placeholder_name(&self) -> String {
        format!("{}{}", VARIABLE_MARKER, self.0)
    }

    /// Parse a placeholder name back into its id.
    pub fn parse(name: &str) -> Option<Self> {
        name.strip_prefix(VARIABLE_MARKER)?.parse().ok().map(VarId)
    }
}

impl std::fmt::Display for VarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.placeholder_name())
    }
}

impl ConceptGraph {
    /// The shared placeholder node for a variable, created on first use.
    pub fn variable(&mut self, var: VarId) -> ConceptId {
        if let Some(id) = self.variables.get(&var) {
            return *id;
        }
        let id = self.push(Concept {
            name: var.placeholder_name(),
            slots: Vec::new(),
        });
        self.variables.insert(var, id);
        id
    }

    /// The variable a placeholder node stands for.
    pub fn variable_of(&self, id: ConceptId) -> Option<VarId> {
        let var = VarId::parse(self.name(id)?)?;
        (self.variables.get(&var) == Some(&id)).then_some(var)
    }

    /// Check whether a variable has been bound.
    pub fn is_bound(&self, var: VarId) -> bool {
        self.bindings.contains_key(&var)
    }

    /// Bind a variable to a value.
    ///
    /// Returns `Ok(false)` without changes when the variable was already bound:
    /// the first binding wins. Fails if `value` resolves back to `var`, or if
    /// the concept it resolves to holds `var` in one of its own slots.
    pub fn bind(&mut self, var: VarId, value: ConceptId) -> Result<bool> {
        if !self.contains(value) {
            return Err(GraphError::UnknownConcept(value));
        }
        if self.is_bound(var) {
            return Ok(false);
        }

        let mut seen = HashSet::new();
        let mut current = value;
        while let Some(next_var) = self.variable_of(current) {
            if next_var == var {
                return Err(GraphError::SelfReferentialVariable(var));
            }
            match self.bindings.get(&next_var) {
                Some(next) if seen.insert(*next) => current = *next,
                _ => break,
            }
        }

        // A slot of the target holding `var` would resolve to the target itself.
        if let Some(&placeholder) = self.variables.get(&var) {
            if self.slots(current).iter().any(|s| s.value == Some(placeholder)) {
                return Err(GraphError::SelfReferentialVariable(var));
            }
        }

        self.variable(var);
        self.bindings.insert(var, value);
        Ok(true)
    }

    /// Bind the variable a placeholder node stands for.
    ///
    /// Returns `Ok(false)` when `placeholder` is not a variable node or is already bound.
    pub fn bind_node(&mut self, placeholder: ConceptId, value: ConceptId) -> Result<bool> {
        match self.variable_of(placeholder) {
            Some(var) => self.bind(var, value),
            None => Ok(false),
        }
    }

    /// Follow variable bindings to a resolved concept.
    ///
    /// Returns `None` for unknown ids and for chains ending at an unbound
    /// placeholder.
    pub fn resolve(&self, id: ConceptId) -> Option<ConceptId> {
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            let concept = self.get(current)?;
            if !concept.is_placeholder() {
                return Some(current);
            }
            let var = self.variable_of(current)?;
            let next = *self.bindings.get(&var)?;
            if !seen.insert(current) {
                return None;
            }
            current = next;
        }
    }

    /// Check whether a concept is still an unresolved placeholder.
    pub fn is_unbound(&self, id: ConceptId) -> bool {
        self.resolve(id).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_name_roundtrip() {
        let var = VarId(42);
        assert_eq!(var.placeholder_name(), "?42");
        assert_eq!(VarId::parse("?42"), Some(var));
        assert_eq!(VarId::parse("John"), None);
    }

    #[test]
    fn test_variable_is_shared() {
        let mut graph = ConceptGraph::new();
        let a = graph.variable(VarId(1));
        let b = graph.variable(VarId(1));
        let c = graph.variable(VarId(2));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(graph.variable_of(a), Some(VarId(1)));
    }

    #[test]
    fn test_co_reference_through_shared_variable() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(7));
        let grasp = graph.concept("GRASP", [("thing", var)]);
        let moved = graph.concept("MOVE", [("to", var)]);
        let ball = graph.add("Ball");

        assert!(graph.bind(VarId(7), ball).unwrap());

        assert_eq!(graph.value(grasp, "thing"), Some(ball));
        assert_eq!(graph.value(moved, "to"), Some(ball));
    }

    #[test]
    fn test_second_bind_is_noop() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(1));
        let first = graph.add("Fred");
        let second = graph.add("John");

        assert!(graph.bind(VarId(1), first).unwrap());
        assert!(!graph.bind(VarId(1), second).unwrap());
        assert_eq!(graph.resolve(var), Some(first));
    }

    #[test]
    fn test_bind_to_self_rejected() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(3));

        let result = graph.bind(VarId(3), var);
        assert_eq!(result, Err(GraphError::SelfReferentialVariable(VarId(3))));
        assert!(!graph.is_bound(VarId(3)));
    }

    #[test]
    fn test_bind_through_chain_rejected() {
        let mut graph = ConceptGraph::new();
        let a = graph.variable(VarId(1));
        let b = graph.variable(VarId(2));

        // ?2 -> ?1, then ?1 -> ?2 would loop.
        assert!(graph.bind(VarId(2), a).unwrap());
        let result = graph.bind(VarId(1), b);
        assert_eq!(result, Err(GraphError::SelfReferentialVariable(VarId(1))));
    }

    #[test]
    fn test_bind_to_own_container_rejected() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(1));
        let quantity = graph.concept("Quantity", [("of", var)]);

        let result = graph.bind(VarId(1), quantity);
        assert_eq!(result, Err(GraphError::SelfReferentialVariable(VarId(1))));
        assert!(!graph.is_bound(VarId(1)));
        assert_eq!(graph.value(quantity, "of"), None);
    }

    #[test]
    fn test_resolve_variable_chain() {
        let mut graph = ConceptGraph::new();
        let a = graph.variable(VarId(1));
        let b = graph.variable(VarId(2));
        let mary = graph.add("Mary");

        graph.bind(VarId(1), b).unwrap();
        assert_eq!(graph.resolve(a), None);

        graph.bind(VarId(2), mary).unwrap();
        assert_eq!(graph.resolve(a), Some(mary));
        assert_eq!(graph.head(a), Some("Mary"));
    }

    #[test]
    fn test_bind_node_ignores_non_variables() {
        let mut graph = ConceptGraph::new();
        let john = graph.add("John");
        let ball = graph.add("Ball");

        assert!(!graph.bind_node(john, ball).unwrap());
        assert_eq!(graph.resolve(john), Some(john));
    }

    #[test]
    fn test_unregistered_placeholder_is_unbound() {
        let mut graph = ConceptGraph::new();
        let stray = graph.add("?stray");
        assert!(graph.is_unbound(stray));
    }
}
