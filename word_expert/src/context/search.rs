//! Linear context search away from a word.

use concept_graph::ConceptGraph;
use serde::{Deserialize, Serialize};

use super::{Probe, SentenceContext};

/// Which way to scan from the starting word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Before,
    After,
}

/// How a search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The matcher accepted this position.
    Found(usize),
    /// The abort probe stopped the scan at this position.
    Aborted(usize),
    /// Ran off the end of the sentence.
    Exhausted,
}

impl SearchOutcome {
    pub fn found(self) -> Option<usize> {
        match self {
            SearchOutcome::Found(index) => Some(index),
            _ => None,
        }
    }
}

/// Scan positions strictly away from `start`.
///
/// At each position the abort probe is tested before the matcher. The
/// starting word itself is never a candidate. Nothing is cached: positions
/// change between scheduler passes, so every caller rescans.
pub fn search_context(
    sentence: &SentenceContext,
    graph: &ConceptGraph,
    start: usize,
    direction: Direction,
    matcher: &Probe,
    abort: &Probe,
) -> SearchOutcome {
    let positions: Box<dyn Iterator<Item = usize>> = match direction {
        Direction::Before => Box::new((0..start.min(sentence.len())).rev()),
        Direction::After => Box::new(start.saturating_add(1)..sentence.len()),
    };

    for index in positions {
        let Some(word) = sentence.word(index) else {
            break;
        };
        if abort.test(graph, word) {
            return SearchOutcome::Aborted(index);
        }
        if matcher.test(graph, word) {
            return SearchOutcome::Found(index);
        }
    }
    SearchOutcome::Exhausted
}
