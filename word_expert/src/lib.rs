//! # Word Expert
//!
//! Interprets English sentences into conceptual dependency graphs one word
//! at a time. Each word's handler builds a concept skeleton with unfilled
//! roles and a set of demons; the demons watch the rest of the sentence and
//! fill those roles until nothing changes any more.
//!
//! ## Core Components
//!
//! - **context**: Per-word concept holders, the sentence they live in, and context search
//! - **demon**: The demon trait, reusable demon behaviours, and the fixpoint scheduler
//! - **disambiguation**: Scored pre-pass choosing between competing word senses
//! - **lexicon**: Word handler boundary, token stream lookup, and tokenization
//! - **memory**: Working memory for a processing run and episodic memory across sentences
//! - **processor**: Runs text through the engine and answers questions against memory
//! - **vocabulary**: A small core vocabulary for exercising the engine
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: Demons run in word order then creation order, single-threaded
//! - **Never fatal**: A sentence always yields the best graph found, unfilled roles included
//! - **Explicit state**: Graph and memories are passed to every demon, never held globally

pub mod config;
pub mod context;
pub mod demon;
pub mod disambiguation;
pub mod error;
pub mod heads;
pub mod lexicon;
pub mod memory;
pub mod processor;
pub mod vocabulary;

pub use config::*;
pub use context::*;
pub use demon::*;
pub use disambiguation::*;
pub use error::{EngineError, Result};
pub use lexicon::*;
pub use memory::*;
pub use processor::*;
