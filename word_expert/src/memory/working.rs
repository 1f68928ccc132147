use concept_graph::{ConceptGraph, ConceptId, Pattern, VarId};

use super::RecencyList;
use crate::heads::{HUMAN, PHYS_OBJ};

/// State of one processing run.
///
/// Holds the finalized top-level concepts in completion order, the variable
/// counter, and who and what was mentioned lately.
#[derive(Debug, Clone)]
pub struct WorkingMemory {
    finalized: Vec<ConceptId>,
    next_var: u32,
    characters: RecencyList<ConceptId>,
    objects: RecencyList<ConceptId>,
}

impl Default for WorkingMemory {
    fn default() -> Self {
        Self::new(16)
    }
}

impl WorkingMemory {
    pub fn new(recent_limit: usize) -> Self {
        Self::starting_at(0, recent_limit)
    }

    /// A fresh run whose variables continue after `next_var`.
    ///
    /// Runs that share a graph must not reuse variable ids.
    pub fn starting_at(next_var: u32, recent_limit: usize) -> Self {
        Self {
            finalized: Vec::new(),
            next_var,
            characters: RecencyList::bounded(recent_limit),
            objects: RecencyList::bounded(recent_limit),
        }
    }

    /// Allocate a variable id never handed out before in this run.
    pub fn fresh_variable(&mut self) -> VarId {
        let var = VarId(self.next_var);
        self.next_var += 1;
        var
    }

    pub fn next_variable(&self) -> u32 {
        self.next_var
    }

    /// Record a completed top-level concept and the entities it mentions.
    pub fn finalize(&mut self, graph: &ConceptGraph, root: ConceptId) {
        self.finalized.push(root);
        for human in graph.find_all(root, |g, id| g.has_head(id, HUMAN)) {
            self.characters.touch(human);
        }
        for object in graph.find_all(root, |g, id| g.has_head(id, PHYS_OBJ)) {
            self.objects.touch(object);
        }
    }

    /// Finalized concepts in completion order.
    pub fn finalized(&self) -> &[ConceptId] {
        &self.finalized
    }

    pub fn characters(&self) -> &RecencyList<ConceptId> {
        &self.characters
    }

    pub fn objects(&self) -> &RecencyList<ConceptId> {
        &self.objects
    }

    pub fn most_recent_character(
        &self,
        graph: &ConceptGraph,
        pattern: &Pattern,
    ) -> Option<ConceptId> {
        self.characters
            .iter()
            .copied()
            .find(|id| pattern.matches(graph, *id))
    }

    pub fn most_recent_object(&self, graph: &ConceptGraph, pattern: &Pattern) -> Option<ConceptId> {
        self.objects
            .iter()
            .copied()
            .find(|id| pattern.matches(graph, *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_variables_are_unique() {
        let mut memory = WorkingMemory::default();
        let a = memory.fresh_variable();
        let b = memory.fresh_variable();
        assert_ne!(a, b);

        let next = WorkingMemory::starting_at(memory.next_variable(), 4).fresh_variable();
        assert_ne!(next, a);
        assert_ne!(next, b);
    }

    #[test]
    fn test_finalize_tracks_mentions() {
        let mut graph = ConceptGraph::new();
        let male = graph.add("Male");
        let female = graph.add("Female");
        let john = graph.concept(HUMAN, [("gender", male)]);
        let mary = graph.concept(HUMAN, [("gender", female)]);
        let ball = graph.add(PHYS_OBJ);
        let grasp = graph.concept("GRASP", [("actor", john), ("thing", ball)]);
        let marry = graph.concept("MARRY", [("actor", john), ("thing", mary)]);

        let mut memory = WorkingMemory::default();
        memory.finalize(&graph, grasp);
        memory.finalize(&graph, marry);

        assert_eq!(memory.finalized(), &[grasp, marry]);
        assert_eq!(memory.objects().front(), Some(&ball));

        let any_human = Pattern::head(HUMAN);
        let male_human = Pattern::head(HUMAN).with_value("gender", "Male");
        assert_eq!(memory.most_recent_character(&graph, &any_human), Some(mary));
        assert_eq!(memory.most_recent_character(&graph, &male_human), Some(john));
        assert_eq!(
            memory.most_recent_object(&graph, &Pattern::head(PHYS_OBJ)),
            Some(ball)
        );
    }

    #[test]
    fn test_recent_limit() {
        let mut graph = ConceptGraph::new();
        let mut memory = WorkingMemory::new(1);
        let a = graph.add(PHYS_OBJ);
        let b = graph.add(PHYS_OBJ);
        memory.finalize(&graph, a);
        memory.finalize(&graph, b);

        assert_eq!(memory.objects().len(), 1);
        assert_eq!(memory.finalized().len(), 2);
    }
}
