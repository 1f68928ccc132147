//! Question answering against what a processor has read.
//!
//! A question runs through the same engine in query mode, so nothing it
//! mentions is recorded or promoted. Its first emitted concept is then
//! unified with the finalized concepts of the run, most recent first.

use concept_graph::{ConceptGraph, ConceptId, ConceptTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::TextProcessor;
use crate::context::Mode;
use crate::error::{EngineError, Result};
use crate::heads::{slots::WH, HUMAN};
use crate::lexicon::tokenize;
use crate::memory::CharacterQuery;

/// What a wh-word in the question was matched to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    /// Dotted slot path of the wh-word inside the question.
    pub path: String,
    pub value: ConceptTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question: ConceptTree,
    /// The remembered concept the question matched, if any.
    pub matched: Option<ConceptTree>,
    pub bindings: Vec<Binding>,
}

impl Answer {
    pub fn is_affirmative(&self) -> bool {
        self.matched.is_some()
    }

    /// The value bound at a wh-word path such as `actor`.
    pub fn binding(&self, path: &str) -> Option<&ConceptTree> {
        self.bindings
            .iter()
            .find(|b| b.path == path)
            .map(|b| &b.value)
    }
}

impl TextProcessor {
    /// Ask a question about the text read so far.
    ///
    /// Fails with [`EngineError::NoSuchCharacter`] when the question names
    /// someone episodic memory has never seen.
    pub fn ask(&mut self, question: &str) -> Result<Answer> {
        let tokens = tokenize(question);
        let emitted = self.run_processor(&tokens, Mode::Query)?;
        self.check_characters(&emitted)?;

        let root = emitted
            .first()
            .copied()
            .ok_or_else(|| EngineError::EmptyQuestion(question.to_string()))?;
        let tree = self
            .graph
            .snapshot(root)
            .ok_or_else(|| EngineError::EmptyQuestion(question.to_string()))?;

        for &fact in self.working.finalized().iter().rev() {
            let mut unifier = Unifier::new(&self.graph);
            if unifier.unify(root, fact) {
                debug!(question, %fact, bindings = unifier.bindings.len(), "answered");
                return Ok(Answer {
                    question: tree,
                    matched: self.graph.snapshot(fact),
                    bindings: unifier.bindings,
                });
            }
        }

        debug!(question, "no matching memory");
        Ok(Answer {
            question: tree,
            matched: None,
            bindings: Vec::new(),
        })
    }

    fn check_characters(&self, roots: &[ConceptId]) -> Result<()> {
        for root in roots {
            for human in self.graph.find_all(*root, |g, id| g.has_head(id, HUMAN)) {
                let query = CharacterQuery::from_concept(&self.graph, human);
                if query.is_named() && self.episodic.find_character(&query).is_none() {
                    return Err(EngineError::NoSuchCharacter(query.describe()));
                }
            }
        }
        Ok(())
    }
}

/// Open-world unification of a question concept with a remembered one.
///
/// Unbound question slots match anything, slots the question does not
/// mention are ignored, and a node carrying a `wh` slot captures whatever
/// it lines up with.
struct Unifier<'a> {
    graph: &'a ConceptGraph,
    visited: HashSet<(ConceptId, ConceptId)>,
    path: Vec<String>,
    bindings: Vec<Binding>,
}

impl<'a> Unifier<'a> {
    fn new(graph: &'a ConceptGraph) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
            path: Vec::new(),
            bindings: Vec::new(),
        }
    }

    fn unify(&mut self, question: ConceptId, fact: ConceptId) -> bool {
        let graph = self.graph;
        let Some(question) = graph.resolve(question) else {
            return true;
        };
        let Some(fact) = graph.resolve(fact) else {
            return false;
        };
        if !self.visited.insert((question, fact)) {
            return true;
        }
        if graph.name(question) != graph.name(fact) {
            return false;
        }

        if graph.value(question, WH).is_some() {
            if let Some(value) = graph.snapshot(fact) {
                self.bindings.push(Binding {
                    path: self.path.join("."),
                    value,
                });
            }
            return true;
        }

        for slot in graph.slots(question) {
            let Some(wanted) = slot.value.and_then(|v| graph.resolve(v)) else {
                continue;
            };
            let Some(actual) = graph.value(fact, &slot.name) else {
                return false;
            };
            self.path.push(slot.name.clone());
            let unified = self.unify(wanted, actual);
            self.path.pop();
            if !unified {
                return false;
            }
        }
        true
    }
}
