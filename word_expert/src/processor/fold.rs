//! Folding finished narrative concepts into episodic memory.

use concept_graph::{ConceptGraph, ConceptId};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::heads::{
    slots::{ACTOR, INSTANCE, THING},
    HUMAN,
};
use crate::memory::{EpisodicMemory, InstanceId};

/// Link every person in `root` to a character, then instantiate the
/// script or relationship its action names, if any.
pub(crate) fn fold_episode(
    graph: &mut ConceptGraph,
    episodic: &mut EpisodicMemory,
    config: &EngineConfig,
    root: ConceptId,
) -> Result<()> {
    let mut participants = Vec::new();
    for human in graph.find_all(root, |g, id| g.has_head(id, HUMAN)) {
        if let Some(id) = link_character(graph, episodic, human)? {
            if !participants.contains(&id) {
                participants.push(id);
            }
        }
    }

    let Some(head) = graph.head(root).map(str::to_string) else {
        return Ok(());
    };
    if let Some(script) = config.scripts.get(&head) {
        episodic.find_or_create_mop(script, participants, root);
    }
    if let Some(kind) = config.relationships.get(&head) {
        let from = linked_character(graph, episodic, root, ACTOR);
        let to = linked_character(graph, episodic, root, THING);
        if let (Some(from), Some(to)) = (from, to) {
            episodic.add_relationship(kind.clone(), from, to);
        }
    }
    Ok(())
}

/// The character a Human concept stands for.
///
/// A concept already carrying an `instance` slot is only promoted; otherwise
/// the character is found or created and the slot is added.
fn link_character(
    graph: &mut ConceptGraph,
    episodic: &mut EpisodicMemory,
    human: ConceptId,
) -> Result<Option<InstanceId>> {
    let linked = graph
        .value_name(human, INSTANCE)
        .and_then(|name| episodic.character(name))
        .map(|c| c.id.clone());
    if let Some(id) = linked {
        episodic.touch(&id);
        return Ok(Some(id));
    }

    let Some(id) = episodic.find_or_create_character(graph, human) else {
        return Ok(None);
    };
    let instance = graph.add(id.as_str());
    graph.set_value(human, INSTANCE, instance)?;
    Ok(Some(id))
}

fn linked_character(
    graph: &ConceptGraph,
    episodic: &EpisodicMemory,
    root: ConceptId,
    slot: &str,
) -> Option<InstanceId> {
    let human = graph.value(root, slot)?;
    let name = graph.value_name(human, INSTANCE)?;
    episodic.character(name).map(|c| c.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human(graph: &mut ConceptGraph, first: &str) -> ConceptId {
        let first = graph.add(first);
        graph.concept(HUMAN, [("firstName", first)])
    }

    #[test]
    fn test_humans_get_instances() {
        let mut graph = ConceptGraph::new();
        let mut episodic = EpisodicMemory::new();
        let john = human(&mut graph, "John");
        let lunch = graph.add("PhysObj");
        let meal = graph.concept("INGEST", [("actor", john), ("thing", lunch)]);

        fold_episode(&mut graph, &mut episodic, &EngineConfig::default(), meal).unwrap();

        assert_eq!(graph.value_name(john, INSTANCE), Some("Character0"));
        let mop = episodic.mops().next().unwrap();
        assert_eq!(mop.script, "MopMeal");
        assert_eq!(mop.participants.len(), 1);
    }

    #[test]
    fn test_refolding_is_stable() {
        let mut graph = ConceptGraph::new();
        let mut episodic = EpisodicMemory::new();
        let john = human(&mut graph, "John");
        let ball = graph.add("PhysObj");
        let kick = graph.concept("PROPEL", [("actor", john), ("thing", ball)]);
        let config = EngineConfig::default();

        fold_episode(&mut graph, &mut episodic, &config, kick).unwrap();
        fold_episode(&mut graph, &mut episodic, &config, kick).unwrap();

        assert_eq!(episodic.characters().count(), 1);
        assert_eq!(episodic.mops().count(), 0);
        assert_eq!(graph.snapshot(john).unwrap().slots.len(), 2);
    }

    #[test]
    fn test_relationship_between_actor_and_thing() {
        let mut graph = ConceptGraph::new();
        let mut episodic = EpisodicMemory::new();
        let john = human(&mut graph, "John");
        let mary = human(&mut graph, "Mary");
        let marry = graph.concept("MARRY", [("actor", john), ("thing", mary)]);

        fold_episode(&mut graph, &mut episodic, &EngineConfig::default(), marry).unwrap();

        let spouse = episodic.relationships().next().unwrap();
        assert_eq!(spouse.kind, "Spouse");
        assert_eq!(spouse.from.as_str(), "Character0");
        assert_eq!(spouse.to.as_str(), "Character1");
    }
}
