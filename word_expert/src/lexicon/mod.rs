//! Lexicon boundary: word handlers and the token-stream lookup.
//!
//! The engine knows nothing about particular words. A [`WordHandler`]
//! builds a concept skeleton for its word plus the demons that complete it,
//! and the [`Lexicon`] finds the handlers that claim the next tokens.

mod tokenize;

pub use tokenize::*;

use concept_graph::{ConceptGraph, ConceptId, VarId};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::context::WordContext;
use crate::demon::Demon;
use crate::heads::{slots::WORD, UNKNOWN};
use crate::memory::WorkingMemory;

/// How a token matched its handler's entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Morphology {
    pub stem: String,
    pub suffix: String,
}

/// What a handler builds for a word: a concept and the demons completing it.
#[derive(Debug, Default)]
pub struct Sense {
    pub concept: Option<ConceptId>,
    pub demons: Vec<Box<dyn Demon>>,
    /// The word is never emitted.
    pub ignore: bool,
}

impl Sense {
    pub fn new(concept: ConceptId) -> Self {
        Self {
            concept: Some(concept),
            demons: Vec::new(),
            ignore: false,
        }
    }

    pub fn with_demon(mut self, demon: impl Demon + 'static) -> Self {
        self.demons.push(Box::new(demon));
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignore = true;
        self
    }
}

/// Handed to [`WordHandler::build`].
pub struct BuildContext<'a> {
    pub graph: &'a mut ConceptGraph,
    pub working: &'a mut WorkingMemory,
    pub word: &'a WordContext,
}

impl BuildContext<'_> {
    /// A fresh variable and its placeholder node.
    pub fn fresh_variable(&mut self) -> (VarId, ConceptId) {
        let var = self.working.fresh_variable();
        (var, self.graph.variable(var))
    }

    /// A concept with no slots.
    pub fn atom(&mut self, name: impl Into<String>) -> ConceptId {
        self.graph.add(name)
    }
}

/// Expert for one word or multi-word expression.
pub trait WordHandler: std::fmt::Debug {
    /// The entry, space-separated for multi-word expressions.
    fn word(&self) -> &str;

    /// Endings accepted on the first word of the entry.
    fn suffixes(&self) -> &[&'static str] {
        &[""]
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense;

    /// Tests scoring this handler when the word is ambiguous.
    fn disambiguation_demons(&self, _word: &WordContext) -> Vec<Box<dyn Demon>> {
        Vec::new()
    }
}

/// A handler claiming the head of a token stream.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub handler: Rc<dyn WordHandler>,
    pub morphology: Morphology,
    /// Number of tokens consumed.
    pub length: usize,
}

/// Fallback for tokens no handler claims: `Unknown(word: <token>)`.
#[derive(Debug, Default)]
pub struct UnknownWord;

impl WordHandler for UnknownWord {
    fn word(&self) -> &str {
        ""
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let token = cx.atom(cx.word.token.clone());
        Sense::new(cx.graph.concept(UNKNOWN, [(WORD, token)]))
    }
}

/// Ordered registry of word handlers.
#[derive(Debug, Default, Clone)]
pub struct Lexicon {
    handlers: Vec<Rc<dyn WordHandler>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: impl WordHandler + 'static) {
        self.handlers.push(Rc::new(handler));
    }

    pub fn with(mut self, handler: impl WordHandler + 'static) -> Self {
        self.register(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handlers claiming the head of `tokens`, longest expression only, in
    /// registration order.
    ///
    /// A non-empty stream nobody claims yields the [`UnknownWord`] handler
    /// for its first token.
    pub fn lookup<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .handlers
            .iter()
            .filter_map(|handler| Self::match_entry(handler, tokens))
            .collect();

        if let Some(longest) = candidates.iter().map(|c| c.length).max() {
            candidates.retain(|c| c.length == longest);
        } else if let Some(first) = tokens.first() {
            candidates.push(Candidate {
                handler: Rc::new(UnknownWord),
                morphology: Morphology {
                    stem: first.as_ref().to_string(),
                    suffix: String::new(),
                },
                length: 1,
            });
        }
        candidates
    }

    fn match_entry<S: AsRef<str>>(handler: &Rc<dyn WordHandler>, tokens: &[S]) -> Option<Candidate> {
        let entry: Vec<&str> = handler.word().split_whitespace().collect();
        let (stem, rest) = entry.split_first()?;
        if tokens.len() < entry.len() {
            return None;
        }

        let first = tokens[0].as_ref().to_lowercase();
        let suffix = handler.suffixes().iter().find(|suffix| {
            first
                .strip_prefix(&stem.to_lowercase())
                .is_some_and(|ending| ending == **suffix)
        })?;
        let rest_matches = rest
            .iter()
            .zip(&tokens[1..])
            .all(|(word, token)| token.as_ref().eq_ignore_ascii_case(word));
        if !rest_matches {
            return None;
        }

        Some(Candidate {
            handler: Rc::clone(handler),
            morphology: Morphology {
                stem: stem.to_string(),
                suffix: suffix.to_string(),
            },
            length: entry.len(),
        })
    }
}
