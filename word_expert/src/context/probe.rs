//! Predicates over word positions, used by context search.

use concept_graph::{ConceptGraph, Pattern};

use super::WordContext;
use crate::heads::UNKNOWN;

/// A test applied to one word position.
///
/// Concept probes look at the position's resolved concept, so a position
/// whose variable has not been bound yet matches none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    Never,
    Any,
    /// Token equality, ignoring case.
    Token(String),
    /// Token ends with the given text, ignoring case.
    TokenSuffix(String),
    Concept(Pattern),
    /// A capitalized word nobody in the lexicon claimed.
    ProperNoun,
    /// The position has no resolved concept yet.
    Unresolved,
    Not(Box<Probe>),
    AnyOf(Vec<Probe>),
}

impl Probe {
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::TokenSuffix(suffix.into())
    }

    /// Match concepts with the given head.
    pub fn head(head: impl Into<String>) -> Self {
        Self::Concept(Pattern::head(head))
    }

    pub fn concept(pattern: Pattern) -> Self {
        Self::Concept(pattern)
    }


    pub fn any_of(probes: impl IntoIterator<Item = Probe>) -> Self {
        Self::AnyOf(probes.into_iter().collect())
    }

    /// Evaluate the probe at a word position.
    pub fn test(&self, graph: &ConceptGraph, word: &WordContext) -> bool {
        match self {
            Probe::Never => false,
            Probe::Any => true,
            Probe::Token(token) => word.token.eq_ignore_ascii_case(token),
            Probe::TokenSuffix(suffix) => word
                .token
                .to_ascii_lowercase()
                .ends_with(&suffix.to_ascii_lowercase()),
            Probe::Concept(pattern) => word
                .resolved(graph)
                .is_some_and(|id| pattern.matches(graph, id)),
            Probe::ProperNoun => {
                word.token.chars().next().is_some_and(char::is_uppercase)
                    && word
                        .resolved(graph)
                        .is_some_and(|id| graph.has_head(id, UNKNOWN))
            }
            Probe::Unresolved => word.resolved(graph).is_none(),
            Probe::Not(inner) => !inner.test(graph, word),
            Probe::AnyOf(probes) => probes.iter().any(|p| p.test(graph, word)),
        }
    }
}

impl std::ops::Not for Probe {
    type Output = Probe;

    fn not(self) -> Probe {
        Probe::Not(Box::new(self))
    }
}
