//! Walks over the concept graph: descendant search and resolved duplication.

use std::collections::HashSet;

use super::{Concept, ConceptGraph, ConceptId, Slot};

impl ConceptGraph {
    /// Find the topmost descendants of `root` matching `predicate`.
    ///
    /// The walk is depth-first through resolved slot values, does not descend
    /// past a match, and visits each concept once, so shared children and
    /// cycles are reported at most once. The root itself is never reported.
    pub fn find_descendants<F>(&self, root: ConceptId, predicate: F) -> Vec<ConceptId>
    where
        F: Fn(&ConceptGraph, ConceptId) -> bool,
    {
        let mut found = Vec::new();
        if let Some(root) = self.resolve(root) {
            let mut visited = HashSet::from([root]);
            self.collect_matches(root, &predicate, &mut visited, &mut found);
        }
        found
    }

    /// Like [`find_descendants`](Self::find_descendants), but the root is eligible too.
    pub fn find_all<F>(&self, root: ConceptId, predicate: F) -> Vec<ConceptId>
    where
        F: Fn(&ConceptGraph, ConceptId) -> bool,
    {
        match self.resolve(root) {
            Some(resolved) if predicate(self, resolved) => vec![resolved],
            Some(resolved) => self.find_descendants(resolved, predicate),
            None => Vec::new(),
        }
    }

    fn collect_matches<F>(
        &self,
        parent: ConceptId,
        predicate: &F,
        visited: &mut HashSet<ConceptId>,
        found: &mut Vec<ConceptId>,
    ) where
        F: Fn(&ConceptGraph, ConceptId) -> bool,
    {
        for slot in self.slots(parent) {
            let Some(child) = slot.value.and_then(|v| self.resolve(v)) else {
                continue;
            };
            if !visited.insert(child) {
                continue;
            }
            if predicate(self, child) {
                found.push(child);
            } else {
                self.collect_matches(child, predicate, visited, found);
            }
        }
    }

    /// Copy a concept keeping only resolved slots.
    ///
    /// An unbound variable is never duplicated: the root yields `None` and a
    /// slot holding one is left out of the copy. A slot leading back to one
    /// of its own ancestors is dropped as well, so the copy always terminates.
    pub fn duplicate_resolved(&mut self, root: ConceptId) -> Option<ConceptId> {
        let mut ancestors = HashSet::new();
        self.duplicate_value(root, &mut ancestors)
    }

    fn duplicate_value(
        &mut self,
        id: ConceptId,
        ancestors: &mut HashSet<ConceptId>,
    ) -> Option<ConceptId> {
        let id = self.resolve(id)?;
        if !ancestors.insert(id) {
            return None;
        }

        let source = self.get(id)?.clone();
        let mut slots = Vec::with_capacity(source.slots.len());
        for slot in source.slots {
            let Some(value) = slot.value else { continue };
            if let Some(copy) = self.duplicate_value(value, ancestors) {
                slots.push(Slot {
                    name: slot.name,
                    value: Some(copy),
                });
            }
        }

        ancestors.remove(&id);
        Some(self.push(Concept {
            name: source.name,
            slots,
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::VarId;

    use super::*;

    fn human(graph: &mut ConceptGraph, first: &str) -> ConceptId {
        let first = graph.add(first);
        graph.concept("Human", [("firstName", first)])
    }

    #[test]
    fn test_find_descendants_topmost_only() {
        let mut graph = ConceptGraph::new();
        let john = human(&mut graph, "John");
        let inner = human(&mut graph, "Inner");
        graph.set_value(john, "friend", inner).unwrap();
        let grasp = graph.concept("GRASP", [("actor", john)]);

        let found = graph.find_descendants(grasp, |g, id| g.has_head(id, "Human"));
        assert_eq!(found, vec![john]);
    }

    #[test]
    fn test_find_descendants_excludes_root() {
        let mut graph = ConceptGraph::new();
        let john = human(&mut graph, "John");

        assert!(graph
            .find_descendants(john, |g, id| g.has_head(id, "Human"))
            .is_empty());
        assert_eq!(
            graph.find_all(john, |g, id| g.has_head(id, "Human")),
            vec![john]
        );
    }

    #[test]
    fn test_find_descendants_through_bound_variable() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(1));
        let grasp = graph.concept("GRASP", [("actor", var)]);
        let moved = graph.concept("MOVE", [("actor", var)]);
        graph.set_value(grasp, "instrument", moved).unwrap();

        assert!(graph
            .find_descendants(grasp, |g, id| g.has_head(id, "Human"))
            .is_empty());

        let john = human(&mut graph, "John");
        graph.bind(VarId(1), john).unwrap();

        // Reached twice (actor and instrument.actor) but reported once.
        let found = graph.find_descendants(grasp, |g, id| g.has_head(id, "Human"));
        assert_eq!(found, vec![john]);
    }

    #[test]
    fn test_find_descendants_terminates_on_cycle() {
        let mut graph = ConceptGraph::new();
        let a = graph.add("A");
        let b = graph.add("B");
        graph.set_value(a, "next", b).unwrap();
        graph.set_value(b, "next", a).unwrap();

        let found = graph.find_descendants(a, |g, id| g.has_head(id, "Missing"));
        assert!(found.is_empty());
    }

    #[test]
    fn test_duplicate_unbound_variable_is_none() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(5));

        assert_eq!(graph.duplicate_resolved(var), None);
    }

    #[test]
    fn test_duplicate_drops_unbound_slots() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(5));
        let holder = graph.concept("Human", [("lastName", var)]);

        let copy = graph.duplicate_resolved(holder).unwrap();
        assert_ne!(copy, holder);
        assert_eq!(graph.name(copy), Some("Human"));
        assert!(graph.slots(copy).is_empty());
    }

    #[test]
    fn test_duplicate_is_equal_and_independent() {
        let mut graph = ConceptGraph::new();
        let john = human(&mut graph, "John");
        let male = graph.add("Male");
        graph.set_value(john, "gender", male).unwrap();

        let copy = graph.duplicate_resolved(john).unwrap();
        assert_eq!(graph.snapshot(copy), graph.snapshot(john));

        let female = graph.add("Female");
        graph.set_value(copy, "gender", female).unwrap();
        assert_eq!(graph.value_name(john, "gender"), Some("Male"));
        assert_eq!(graph.value_name(copy, "gender"), Some("Female"));
    }

    #[test]
    fn test_duplicate_follows_bound_variables() {
        let mut graph = ConceptGraph::new();
        let var = graph.variable(VarId(2));
        let grasp = graph.concept("GRASP", [("thing", var)]);
        let ball = graph.add("Ball");
        graph.bind(VarId(2), ball).unwrap();

        let copy = graph.duplicate_resolved(grasp).unwrap();
        let thing = graph.slot_ref(copy, "thing").unwrap();
        assert_ne!(thing, ball);
        assert_eq!(graph.name(thing), Some("Ball"));
        assert!(graph.variable_of(thing).is_none());
    }

    #[test]
    fn test_duplicate_terminates_on_cycle() {
        let mut graph = ConceptGraph::new();
        let a = graph.add("A");
        let b = graph.add("B");
        graph.set_value(a, "next", b).unwrap();
        graph.set_value(b, "back", a).unwrap();

        let copy = graph.duplicate_resolved(a).unwrap();
        let b_copy = graph.value(copy, "next").unwrap();
        assert_eq!(graph.name(b_copy), Some("B"));
        assert!(graph.slots(b_copy).is_empty());
    }
}
