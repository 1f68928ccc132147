//! The text processor: runs sentences through the engine.
//!
//! A processor owns everything one run needs. Sentences read one after
//! another share its graph and memories, so later sentences can refer back
//! to what earlier ones mentioned, and questions can be asked afterwards.

mod fold;
mod query;

pub use query::*;

use concept_graph::{ConceptGraph, ConceptId, ConceptTree};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::context::{Mode, SentenceContext};
use crate::demon::Scheduler;
use crate::disambiguation::choose_candidate;
use crate::error::Result;
use crate::lexicon::{split_sentences, tokenize, BuildContext, Lexicon};
use crate::memory::{EpisodicMemory, WorkingMemory};
use crate::vocabulary::core_lexicon;

/// Identifier of a processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Output of reading a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub run: RunId,
    /// Emitted concepts in word order across sentences.
    pub roots: Vec<ConceptId>,
    /// Snapshots of `roots`, in the same order.
    pub concepts: Vec<ConceptTree>,
}

impl Interpretation {
    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Reads text into concepts and keeps the memories it builds.
#[derive(Debug)]
pub struct TextProcessor {
    id: RunId,
    config: EngineConfig,
    lexicon: Lexicon,
    graph: ConceptGraph,
    working: WorkingMemory,
    episodic: EpisodicMemory,
}

impl TextProcessor {
    pub fn new(config: EngineConfig, lexicon: Lexicon) -> Self {
        let working = WorkingMemory::new(config.recent_limit);
        Self {
            id: RunId::new(),
            config,
            lexicon,
            graph: ConceptGraph::new(),
            working,
            episodic: EpisodicMemory::new(),
        }
    }

    /// A processor using the bundled core vocabulary.
    pub fn with_core_vocabulary(config: EngineConfig) -> Result<Self> {
        Ok(Self::new(config, core_lexicon()?))
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn graph(&self) -> &ConceptGraph {
        &self.graph
    }

    pub fn working(&self) -> &WorkingMemory {
        &self.working
    }

    pub fn episodic(&self) -> &EpisodicMemory {
        &self.episodic
    }

    /// Start a new run: fresh working memory, same episodic memory.
    pub fn start_run(&mut self) -> RunId {
        self.id = RunId::new();
        self.working = WorkingMemory::starting_at(self.working.next_variable(), self.config.recent_limit);
        debug!(run = %self.id, "started run");
        self.id
    }

    /// Read a text sentence by sentence.
    pub fn run_text_process(&mut self, text: &str) -> Result<Interpretation> {
        let tokens = tokenize(text);
        let mut roots = Vec::new();
        for sentence in split_sentences(&tokens) {
            roots.extend(self.run_processor(&sentence, Mode::Narrative)?);
        }

        let concepts = roots
            .iter()
            .filter_map(|root| self.graph.snapshot(*root))
            .collect();
        Ok(Interpretation {
            run: self.id,
            roots,
            concepts,
        })
    }

    /// Interpret one sentence and return its emitted concepts.
    ///
    /// Words are segmented by lexicon lookup, disambiguated and built in
    /// order, then all their demons run to a fixpoint together. In narrative
    /// mode the emitted concepts are recorded in working memory and folded
    /// into episodic memory.
    pub fn run_processor<S: AsRef<str>>(&mut self, tokens: &[S], mode: Mode) -> Result<Vec<ConceptId>> {
        let mut sentence = SentenceContext::new(mode);
        let mut candidates = Vec::new();
        let mut pos = 0;
        while pos < tokens.len() {
            let found = self.lexicon.lookup(&tokens[pos..]);
            let Some(length) = found.first().map(|c| c.length) else {
                break;
            };
            let token = tokens[pos..pos + length]
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(" ");
            sentence.push(token);
            candidates.push(found);
            pos += length;
        }

        let mut scheduler = Scheduler::new();
        for (index, found) in candidates.iter().enumerate() {
            let choice = choose_candidate(
                found,
                index,
                &mut self.graph,
                &mut sentence,
                &mut self.working,
                &mut self.episodic,
            );
            let Some(candidate) = found.get(choice.index) else {
                continue;
            };
            let Some(word) = sentence.word_mut(index) else {
                continue;
            };
            word.morphology = candidate.morphology.clone();

            let sense = candidate.handler.build(&mut BuildContext {
                graph: &mut self.graph,
                working: &mut self.working,
                word,
            });

            if let Some(concept) = sense.concept {
                word.holder.set_concept(concept);
            }
            if sense.ignore {
                word.holder.mark_ignore();
            }
            for demon in sense.demons {
                scheduler.register(index, demon);
            }
        }

        let report = scheduler.run(
            &mut self.graph,
            &mut sentence,
            &mut self.working,
            &mut self.episodic,
        );
        let emitted = sentence.emitted(&self.graph);
        info!(
            run = %self.id,
            ?mode,
            words = sentence.len(),
            emitted = emitted.len(),
            passes = report.passes,
            abandoned = report.abandoned.len(),
            "processed sentence"
        );

        if mode == Mode::Narrative {
            for root in &emitted {
                self.working.finalize(&self.graph, *root);
                if self.config.fold_episodes {
                    fold::fold_episode(&mut self.graph, &mut self.episodic, &self.config, *root)?;
                }
            }
        }
        Ok(emitted)
    }
}

/// Read a text with the core vocabulary and default configuration.
///
/// Returns the interpretation together with the episodic memory it built.
pub fn run_text_process(text: &str) -> Result<(Interpretation, EpisodicMemory)> {
    let mut processor = TextProcessor::with_core_vocabulary(EngineConfig::default())?;
    let interpretation = processor.run_text_process(text)?;
    Ok((interpretation, processor.episodic))
}
