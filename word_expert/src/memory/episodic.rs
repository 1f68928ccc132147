//! Episodic memory: entities that outlive the sentence they were read in.
//!
//! Characters are found before they are created: a structural query built
//! from whatever is known about a mention is matched against existing
//! characters in recency order, and only a miss mints a new instance.

use concept_graph::{ConceptGraph, ConceptId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::RecencyList;
use crate::heads::slots::{FIRST_NAME, GENDER, LAST_NAME, ROLE};

/// Identifier of an episodic entity, `<TypeName><sequence>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for InstanceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person the narrative has mentioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: InstanceId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
    /// Resolved copy of the concept the character was created from.
    pub concept: ConceptId,
}

/// Open-world character matcher: unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub role: Option<String>,
}

impl CharacterQuery {
    /// Build a query from the resolved slots of a Human concept.
    ///
    /// Empty names, as produced by a bare title, count as unknown.
    pub fn from_concept(graph: &ConceptGraph, concept: ConceptId) -> Self {
        let field = |slot: &str| {
            graph
                .value_name(concept, slot)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        };
        Self {
            first_name: field(FIRST_NAME),
            last_name: field(LAST_NAME),
            gender: field(GENDER),
            role: field(ROLE),
        }
    }

    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.gender.is_none()
            && self.role.is_none()
    }

    /// Whether the query carries a first or last name.
    pub fn is_named(&self) -> bool {
        self.first_name.is_some() || self.last_name.is_some()
    }

    /// An empty query identifies nobody and never matches.
    pub fn matches(&self, character: &Character) -> bool {
        fn agrees(wanted: &Option<String>, actual: &Option<String>) -> bool {
            wanted.is_none() || wanted == actual
        }
        !self.is_empty()
            && agrees(&self.first_name, &character.first_name)
            && agrees(&self.last_name, &character.last_name)
            && agrees(&self.gender, &character.gender)
            && agrees(&self.role, &character.role)
    }

    /// Human-readable summary, names first.
    pub fn describe(&self) -> String {
        let names: Vec<&str> = [&self.first_name, &self.last_name]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if !names.is_empty() {
            return names.join(" ");
        }
        [&self.role, &self.gender]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// An instantiated script (memory organization packet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MopInstance {
    pub id: InstanceId,
    pub script: String,
    pub participants: Vec<InstanceId>,
    pub concept: ConceptId,
}

/// A directed relationship between two characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: InstanceId,
    pub kind: String,
    pub from: InstanceId,
    pub to: InstanceId,
}

/// Cross-sentence store of characters, scripts and relationships.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EpisodicMemory {
    characters: BTreeMap<InstanceId, Character>,
    mops: BTreeMap<InstanceId, MopInstance>,
    relationships: BTreeMap<InstanceId, Relationship>,
    /// Next sequence number per type name.
    #[serde(default)]
    sequences: BTreeMap<String, u32>,
    recency: RecencyList<InstanceId>,
}

impl EpisodicMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next id for a type: `Character0`, `Character1`, ...
    ///
    /// Ids already in use are skipped, so memory restored without its
    /// counters never hands out an existing id again.
    fn mint(&mut self, type_name: &str) -> InstanceId {
        loop {
            let seq = self.sequences.entry(type_name.to_string()).or_insert(0);
            let id = InstanceId(format!("{type_name}{seq}"));
            *seq += 1;
            if !self.contains(&id) {
                return id;
            }
        }
    }

    fn contains(&self, id: &InstanceId) -> bool {
        self.characters.contains_key(id)
            || self.mops.contains_key(id)
            || self.relationships.contains_key(id)
    }

    /// Promote an entity to the front of the recency list.
    pub fn touch(&mut self, id: &InstanceId) {
        self.recency.touch(id.clone());
    }

    /// First character matching `query`, most recently touched first.
    pub fn find_character(&self, query: &CharacterQuery) -> Option<&Character> {
        self.recency
            .iter()
            .filter_map(|id| self.characters.get(id))
            .find(|c| query.matches(c))
    }

    /// Find the character a Human concept refers to, creating one on a miss.
    ///
    /// A hit is returned untouched apart from recency. A miss copies the
    /// resolved fields and a resolved duplicate of the concept. Returns
    /// `None` when the concept carries nothing to identify anyone by.
    pub fn find_or_create_character(
        &mut self,
        graph: &mut ConceptGraph,
        concept: ConceptId,
    ) -> Option<InstanceId> {
        let query = CharacterQuery::from_concept(graph, concept);
        if query.is_empty() {
            return None;
        }

        if let Some(existing) = self.find_character(&query) {
            let id = existing.id.clone();
            self.touch(&id);
            return Some(id);
        }

        let copy = graph.duplicate_resolved(concept)?;
        let id = self.mint("Character");
        debug!(instance = %id, character = %query.describe(), "created character");
        self.characters.insert(
            id.clone(),
            Character {
                id: id.clone(),
                first_name: query.first_name,
                last_name: query.last_name,
                gender: query.gender,
                role: query.role,
                concept: copy,
            },
        );
        self.touch(&id);
        Some(id)
    }

    /// The most recently touched character accepted by `filter`.
    pub fn most_recent_character<F>(&self, filter: F) -> Option<&Character>
    where
        F: Fn(&Character) -> bool,
    {
        self.recency
            .iter()
            .filter_map(|id| self.characters.get(id))
            .find(|c| filter(c))
    }

    /// Find the running instance of a script, creating one on a miss.
    ///
    /// Instances are matched by script name alone, so two concurrent
    /// instances of the same script collapse into one. New participants are
    /// added to an existing instance.
    pub fn find_or_create_mop(
        &mut self,
        script: &str,
        participants: Vec<InstanceId>,
        concept: ConceptId,
    ) -> InstanceId {
        let existing = self
            .recency
            .iter()
            .find(|id| self.mops.get(*id).is_some_and(|m| m.script == script))
            .cloned();

        let id = match existing.and_then(|id| self.mops.get_mut(&id)) {
            Some(mop) => {
                for participant in participants {
                    if !mop.participants.contains(&participant) {
                        mop.participants.push(participant);
                    }
                }
                mop.id.clone()
            }
            None => {
                let id = self.mint(script);
                debug!(instance = %id, script, "created script instance");
                self.mops.insert(
                    id.clone(),
                    MopInstance {
                        id: id.clone(),
                        script: script.to_string(),
                        participants,
                        concept,
                    },
                );
                id
            }
        };
        self.touch(&id);
        id
    }

    /// Record a relationship. Relationships are never deduplicated.
    pub fn add_relationship(
        &mut self,
        kind: impl Into<String>,
        from: InstanceId,
        to: InstanceId,
    ) -> InstanceId {
        let id = self.mint("Relationship");
        let kind = kind.into();
        debug!(instance = %id, %kind, %from, %to, "created relationship");
        self.relationships.insert(
            id.clone(),
            Relationship {
                id: id.clone(),
                kind,
                from,
                to,
            },
        );
        self.touch(&id);
        id
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.get(id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn mop(&self, id: &str) -> Option<&MopInstance> {
        self.mops.get(id)
    }

    pub fn mops(&self) -> impl Iterator<Item = &MopInstance> {
        self.mops.values()
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub fn recency(&self) -> &RecencyList<InstanceId> {
        &self.recency
    }
}
