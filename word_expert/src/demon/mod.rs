//! Demons: word-bound rules that watch the sentence and fill roles.
//!
//! A demon is run once per scheduler pass until it reports `Done` or
//! `Failed`. Its `run` must be safe to repeat while its precondition is not
//! met; it sees the graph and both memories through a [`DemonContext`].

mod library;
mod scheduler;

pub use library::*;
pub use scheduler::*;

use concept_graph::{ConceptGraph, ConceptId};

use crate::context::{search_context, Direction, Mode, Probe, SearchOutcome, SentenceContext};
use crate::memory::{EpisodicMemory, WorkingMemory};

/// Result of one demon run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Precondition not met yet; run again next pass.
    Pending,
    /// Condition satisfied. Never run again.
    Done,
    /// Condition can no longer be satisfied. Never run again.
    Failed,
}

/// A stateful rule bound to one word.
pub trait Demon: std::fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn run(&mut self, cx: &mut DemonContext<'_>) -> Step;
}

/// Everything a demon may read or change during one run.
pub struct DemonContext<'a> {
    pub graph: &'a mut ConceptGraph,
    pub sentence: &'a mut SentenceContext,
    pub working: &'a mut WorkingMemory,
    pub episodic: &'a mut EpisodicMemory,
    word: usize,
    spawned: Vec<Box<dyn Demon>>,
}

impl<'a> DemonContext<'a> {
    pub fn new(
        graph: &'a mut ConceptGraph,
        sentence: &'a mut SentenceContext,
        working: &'a mut WorkingMemory,
        episodic: &'a mut EpisodicMemory,
        word: usize,
    ) -> Self {
        Self {
            graph,
            sentence,
            working,
            episodic,
            word,
            spawned: Vec::new(),
        }
    }

    /// Index of the word the running demon belongs to.
    pub fn word(&self) -> usize {
        self.word
    }

    pub fn mode(&self) -> Mode {
        self.sentence.mode()
    }

    /// Search the sentence away from this demon's word.
    pub fn search(&self, direction: Direction, matcher: &Probe, abort: &Probe) -> SearchOutcome {
        search_context(self.sentence, self.graph, self.word, direction, matcher, abort)
    }

    /// Raw concept held at a position.
    pub fn concept_at(&self, index: usize) -> Option<ConceptId> {
        self.sentence.word(index)?.holder.concept()
    }

    /// Resolved concept held at a position.
    pub fn resolved_at(&self, index: usize) -> Option<ConceptId> {
        self.sentence.word(index)?.resolved(self.graph)
    }

    pub fn mark_inside(&mut self, index: usize) {
        if let Some(word) = self.sentence.word_mut(index) {
            word.holder.mark_inside();
        }
    }

    pub fn mark_ignore(&mut self, index: usize) {
        if let Some(word) = self.sentence.word_mut(index) {
            word.holder.mark_ignore();
        }
    }

    /// Queue a demon for this word. It becomes active after the current pass.
    pub fn spawn(&mut self, demon: Box<dyn Demon>) {
        self.spawned.push(demon);
    }

    pub fn take_spawned(&mut self) -> Vec<Box<dyn Demon>> {
        std::mem::take(&mut self.spawned)
    }
}
