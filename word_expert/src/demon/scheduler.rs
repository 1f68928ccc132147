//! Fixpoint scheduler.

use concept_graph::ConceptGraph;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Demon, DemonContext, Step};
use crate::context::SentenceContext;
use crate::memory::{EpisodicMemory, WorkingMemory};

#[derive(Debug)]
struct Entry {
    word: usize,
    seq: u64,
    tag: Option<usize>,
    active: bool,
    demon: Box<dyn Demon>,
}

/// A demon still active when the scheduler settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abandoned {
    pub word: usize,
    pub demon: String,
}

/// Summary of one scheduler run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub passes: usize,
    /// Tag of every tagged demon that finished `Done`, in completion order.
    pub completed_tags: Vec<usize>,
    pub completed: usize,
    pub failed: usize,
    pub abandoned: Vec<Abandoned>,
}

/// Runs demons in passes until a pass changes nothing.
///
/// Within a pass demons run by word position, then by registration order.
/// A pass with no demon finishing and no demon spawned is the fixpoint;
/// demons still active then are abandoned, never an error.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, word: usize, demon: Box<dyn Demon>) {
        self.insert(word, None, demon);
    }

    /// Register a demon whose `Done` is reported under `tag`.
    pub fn register_tagged(&mut self, word: usize, tag: usize, demon: Box<dyn Demon>) {
        self.insert(word, Some(tag), demon);
    }

    fn insert(&mut self, word: usize, tag: Option<usize>, demon: Box<dyn Demon>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let at = self
            .entries
            .partition_point(|e| (e.word, e.seq) < (word, seq));
        self.entries.insert(
            at,
            Entry {
                word,
                seq,
                tag,
                active: true,
                demon,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.entries.iter().filter(|e| e.active).count()
    }

    /// Run every active demon to the fixpoint.
    pub fn run(
        &mut self,
        graph: &mut ConceptGraph,
        sentence: &mut SentenceContext,
        working: &mut WorkingMemory,
        episodic: &mut EpisodicMemory,
    ) -> RunReport {
        let mut report = RunReport::default();

        loop {
            report.passes += 1;
            let mut deactivated = 0;
            let mut spawned = Vec::new();

            for entry in self.entries.iter_mut().filter(|e| e.active) {
                let mut cx = DemonContext::new(graph, sentence, working, episodic, entry.word);
                let step = entry.demon.run(&mut cx);
                spawned.extend(
                    cx.take_spawned()
                        .into_iter()
                        .map(|demon| (entry.word, entry.tag, demon)),
                );

                match step {
                    Step::Pending => continue,
                    Step::Done => {
                        report.completed += 1;
                        report.completed_tags.extend(entry.tag);
                    }
                    Step::Failed => report.failed += 1,
                }
                entry.active = false;
                deactivated += 1;
                debug!(demon = entry.demon.name(), word = entry.word, ?step, "demon finished");
            }

            let activated = spawned.len();
            for (word, tag, demon) in spawned {
                self.insert(word, tag, demon);
            }

            trace!(pass = report.passes, deactivated, activated, "scheduler pass");
            if deactivated == 0 && activated == 0 {
                break;
            }
        }

        for entry in self.entries.iter().filter(|e| e.active) {
            debug!(demon = entry.demon.name(), word = entry.word, "demon abandoned");
            report.abandoned.push(Abandoned {
                word: entry.word,
                demon: entry.demon.name().to_string(),
            });
        }
        report
    }
}
