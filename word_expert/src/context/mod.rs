//! Context model: one concept holder per word, and the sentence they form.

mod probe;
mod search;

pub use probe::*;
pub use search::*;

use concept_graph::{ConceptGraph, ConceptId};
use serde::{Deserialize, Serialize};

use crate::lexicon::Morphology;

/// Whether a sentence is being read as narrative or asked as a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Emitted concepts are recorded and folded into episodic memory.
    #[default]
    Narrative,
    /// Read-only against memory: nothing is recorded or promoted.
    Query,
}

/// Exclusion flags of a holder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderFlags {
    /// Never emitted.
    pub ignore: bool,
    /// Nested inside another concept, so not emitted at top level.
    pub inside: bool,
}

/// The current best-guess concept for one word position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptHolder {
    concept: Option<ConceptId>,
    flags: HolderFlags,
}

impl ConceptHolder {
    pub fn concept(&self) -> Option<ConceptId> {
        self.concept
    }

    pub fn set_concept(&mut self, concept: ConceptId) {
        self.concept = Some(concept);
    }

    pub fn flags(&self) -> HolderFlags {
        self.flags
    }

    pub fn mark_ignore(&mut self) {
        self.flags.ignore = true;
    }

    pub fn mark_inside(&mut self) {
        self.flags.inside = true;
    }

    /// Whether this holder appears in the top-level output.
    pub fn is_emittable(&self) -> bool {
        self.concept.is_some() && !self.flags.ignore && !self.flags.inside
    }
}

/// A word position in a sentence.
///
/// A multi-word expression such as "pick up" occupies a single position;
/// `token` then holds the matched tokens joined by a space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordContext {
    pub index: usize,
    pub token: String,
    pub morphology: Morphology,
    pub holder: ConceptHolder,
}

impl WordContext {
    pub fn new(index: usize, token: impl Into<String>) -> Self {
        Self {
            index,
            token: token.into(),
            morphology: Morphology::default(),
            holder: ConceptHolder::default(),
        }
    }

    /// The holder's concept after following variable bindings.
    pub fn resolved(&self, graph: &ConceptGraph) -> Option<ConceptId> {
        self.holder.concept().and_then(|c| graph.resolve(c))
    }
}

/// The ordered words of one sentence.
#[derive(Debug, Clone, Default)]
pub struct SentenceContext {
    words: Vec<WordContext>,
    mode: Mode,
}

impl SentenceContext {
    pub fn new(mode: Mode) -> Self {
        Self {
            words: Vec::new(),
            mode,
        }
    }

    /// Append a word and return its index.
    pub fn push(&mut self, token: impl Into<String>) -> usize {
        let index = self.words.len();
        self.words.push(WordContext::new(index, token));
        index
    }

    pub fn word(&self, index: usize) -> Option<&WordContext> {
        self.words.get(index)
    }

    pub fn word_mut(&mut self, index: usize) -> Option<&mut WordContext> {
        self.words.get_mut(index)
    }

    pub fn words(&self) -> &[WordContext] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Concepts of every emittable holder, in word order.
    ///
    /// Bound variables are followed; a holder whose variable never resolved
    /// is emitted as its placeholder.
    pub fn emitted(&self, graph: &ConceptGraph) -> Vec<ConceptId> {
        self.words
            .iter()
            .filter(|w| w.holder.is_emittable())
            .filter_map(|w| w.holder.concept())
            .map(|c| graph.resolve(c).unwrap_or(c))
            .collect()
    }
}
