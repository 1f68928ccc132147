//! Choosing between competing senses of one word.
//!
//! Every candidate contributes its disambiguation demons to a scheduler
//! pre-pass, tagged with the candidate's position. Each demon finishing
//! `Done` scores a point for its candidate; the best score wins and ties go
//! to the candidate registered first.

use concept_graph::ConceptGraph;
use tracing::debug;

use crate::context::SentenceContext;
use crate::demon::Scheduler;
use crate::lexicon::Candidate;
use crate::memory::{EpisodicMemory, WorkingMemory};

/// The outcome of a disambiguation pre-pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub index: usize,
    pub scores: Vec<usize>,
}

/// Index of the first highest score; 0 for no scores.
pub fn pick_winner(scores: &[usize]) -> usize {
    let mut winner = 0;
    for (index, score) in scores.iter().enumerate() {
        if *score > scores[winner] {
            winner = index;
        }
    }
    winner
}

/// Pick the candidate for the word at `word`.
///
/// A single candidate is chosen without running anything.
pub fn choose_candidate(
    candidates: &[Candidate],
    word: usize,
    graph: &mut ConceptGraph,
    sentence: &mut SentenceContext,
    working: &mut WorkingMemory,
    episodic: &mut EpisodicMemory,
) -> Choice {
    if candidates.len() <= 1 {
        return Choice {
            index: 0,
            scores: vec![0; candidates.len()],
        };
    }

    let mut scheduler = Scheduler::new();
    if let Some(context) = sentence.word(word) {
        for (tag, candidate) in candidates.iter().enumerate() {
            for demon in candidate.handler.disambiguation_demons(context) {
                scheduler.register_tagged(word, tag, demon);
            }
        }
    }

    let report = scheduler.run(graph, sentence, working, episodic);
    let mut scores = vec![0; candidates.len()];
    for tag in report.completed_tags {
        if let Some(score) = scores.get_mut(tag) {
            *score += 1;
        }
    }

    let index = pick_winner(&scores);
    debug!(
        word,
        token = sentence.word(word).map(|w| w.token.as_str()),
        ?scores,
        chosen = index,
        "disambiguated"
    );
    Choice { index, scores }
}
