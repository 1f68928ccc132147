//! Engine errors.
//!
//! Interpretation itself never fails: an unresolved role is left as an
//! unbound variable. Errors cover setup (configuration, vocabulary) and the
//! question-answering conditions a caller has to handle.

use std::path::PathBuf;

use concept_graph::GraphError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A question names a character episodic memory has never seen.
    #[error("no mention of character {0}")]
    NoSuchCharacter(String),

    /// A question was interpreted into nothing that could be matched.
    #[error("question {0:?} produced no concept")]
    EmptyQuestion(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
