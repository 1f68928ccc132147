//! Reusable demon behaviours that word handlers compose.

use concept_graph::{ConceptId, Pattern, VarId};
use tracing::{debug, warn};

use super::{Demon, DemonContext, Step};
use crate::context::{Direction, Mode, Probe, SearchOutcome};
use crate::heads::{slots::GENDER, HUMAN, PHYS_OBJ};

/// What happens to the holder a value was taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Absorb {
    #[default]
    Leave,
    /// The value now lives inside another concept.
    Inside,
    /// The source word is consumed entirely.
    Ignore,
}

/// What a [`FillSlot`] does when its search hits the abort probe.
#[derive(Debug, Default)]
pub enum OnAbort {
    /// Stay active and search again next pass.
    #[default]
    Wait,
    Fail,
    /// Finish and hand over to follow-up demons on the same word.
    Chain(Vec<Box<dyn Demon>>),
}

/// Bind a variable to a concept found in the sentence.
///
/// Finishes without doing anything when the variable was bound by someone
/// else first.
#[derive(Debug)]
pub struct FillSlot {
    name: &'static str,
    var: VarId,
    direction: Direction,
    matcher: Probe,
    abort: Probe,
    lift: Option<&'static str>,
    absorb: Absorb,
    on_abort: OnAbort,
}

impl FillSlot {
    pub fn new(name: &'static str, var: VarId, direction: Direction, matcher: Probe) -> Self {
        Self {
            name,
            var,
            direction,
            matcher,
            abort: Probe::Never,
            lift: None,
            absorb: Absorb::Leave,
            on_abort: OnAbort::Wait,
        }
    }

    pub fn abort(mut self, abort: Probe) -> Self {
        self.abort = abort;
        self
    }

    /// Bind to this slot of the found concept instead of the concept itself.
    pub fn lift(mut self, slot: &'static str) -> Self {
        self.lift = Some(slot);
        self
    }

    pub fn absorb(mut self, absorb: Absorb) -> Self {
        self.absorb = absorb;
        self
    }

    pub fn on_abort(mut self, on_abort: OnAbort) -> Self {
        self.on_abort = on_abort;
        self
    }

    fn aborted(&mut self, cx: &mut DemonContext<'_>) -> Step {
        match &mut self.on_abort {
            OnAbort::Wait => Step::Pending,
            OnAbort::Fail => Step::Failed,
            OnAbort::Chain(next) => {
                debug!(demon = self.name, word = cx.word(), "handing over");
                for demon in std::mem::take(next) {
                    cx.spawn(demon);
                }
                Step::Done
            }
        }
    }
}

impl Demon for FillSlot {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self, cx: &mut DemonContext<'_>) -> Step {
        if cx.graph.is_bound(self.var) {
            return Step::Done;
        }

        let index = match cx.search(self.direction, &self.matcher, &self.abort) {
            SearchOutcome::Found(index) => index,
            SearchOutcome::Aborted(_) => return self.aborted(cx),
            SearchOutcome::Exhausted => return Step::Pending,
        };

        let Some(source) = cx.resolved_at(index) else {
            return Step::Pending;
        };
        let value = match self.lift {
            Some(slot) => match cx.graph.value(source, slot) {
                Some(value) => value,
                None => return Step::Pending,
            },
            None => source,
        };

        match cx.graph.bind(self.var, value) {
            Ok(_) => {
                match self.absorb {
                    Absorb::Leave => {}
                    Absorb::Inside => cx.mark_inside(index),
                    Absorb::Ignore => cx.mark_ignore(index),
                }
                Step::Done
            }
            Err(error) => {
                warn!(demon = self.name, word = cx.word(), %error, "rejected binding");
                Step::Failed
            }
        }
    }
}

/// Set a slot on a concept found in the sentence, e.g. definiteness.
#[derive(Debug)]
pub struct MarkSlot {
    name: &'static str,
    direction: Direction,
    matcher: Probe,
    abort: Probe,
    slot: &'static str,
    value: ConceptId,
}

impl MarkSlot {
    pub fn new(
        name: &'static str,
        direction: Direction,
        matcher: Probe,
        slot: &'static str,
        value: ConceptId,
    ) -> Self {
        Self {
            name,
            direction,
            matcher,
            abort: Probe::Never,
            slot,
            value,
        }
    }

    pub fn abort(mut self, abort: Probe) -> Self {
        self.abort = abort;
        self
    }
}

impl Demon for MarkSlot {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self, cx: &mut DemonContext<'_>) -> Step {
        let index = match cx.search(self.direction, &self.matcher, &self.abort) {
            SearchOutcome::Found(index) => index,
            SearchOutcome::Aborted(_) => return Step::Failed,
            SearchOutcome::Exhausted => return Step::Pending,
        };
        let Some(target) = cx.resolved_at(index) else {
            return Step::Pending;
        };
        match cx.graph.set_value(target, self.slot, self.value) {
            Ok(()) => Step::Done,
            Err(error) => {
                warn!(demon = self.name, word = cx.word(), %error, "rejected slot");
                Step::Failed
            }
        }
    }
}

/// What a pronoun may refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Referent {
    /// A person, optionally of a given gender.
    Character { gender: Option<String> },
    Object,
}

impl Referent {
    pub fn pattern(&self) -> Pattern {
        match self {
            Referent::Character { gender: Some(gender) } => {
                Pattern::head(HUMAN).with_value(GENDER, gender.clone())
            }
            Referent::Character { gender: None } => Pattern::head(HUMAN),
            Referent::Object => Pattern::head(PHYS_OBJ),
        }
    }
}

/// Resolve a pronoun.
///
/// Looks back through the sentence first, then at what this run mentioned
/// recently, then at characters in episodic memory. An unresolvable pronoun
/// stays active and unbound.
#[derive(Debug)]
pub struct ResolveReference {
    var: VarId,
    referent: Referent,
}

impl ResolveReference {
    pub fn new(var: VarId, referent: Referent) -> Self {
        Self { var, referent }
    }

    fn from_memory(&self, cx: &mut DemonContext<'_>) -> Option<ConceptId> {
        let pattern = self.referent.pattern();
        let recent = match self.referent {
            Referent::Character { .. } => cx.working.most_recent_character(cx.graph, &pattern),
            Referent::Object => cx.working.most_recent_object(cx.graph, &pattern),
        };
        if recent.is_some() {
            return recent;
        }

        let Referent::Character { gender } = &self.referent else {
            return None;
        };
        let character = cx
            .episodic
            .most_recent_character(|c| gender.is_none() || c.gender == *gender)?;
        let (id, concept) = (character.id.clone(), character.concept);
        if cx.mode() == Mode::Narrative {
            cx.episodic.touch(&id);
        }
        Some(concept)
    }
}

impl Demon for ResolveReference {
    fn name(&self) -> &str {
        "resolve-reference"
    }

    fn run(&mut self, cx: &mut DemonContext<'_>) -> Step {
        if cx.graph.is_bound(self.var) {
            return Step::Done;
        }

        let in_sentence = cx
            .search(
                Direction::Before,
                &Probe::concept(self.referent.pattern()),
                &Probe::Never,
            )
            .found()
            .and_then(|index| cx.resolved_at(index));

        let Some(referent) = in_sentence.or_else(|| self.from_memory(cx)) else {
            return Step::Pending;
        };

        match cx.graph.bind(self.var, referent) {
            Ok(_) => Step::Done,
            Err(error) => {
                warn!(word = cx.word(), %error, "rejected referent");
                Step::Failed
            }
        }
    }
}

/// A disambiguation test: `Done` when the matcher is found, `Failed` otherwise.
#[derive(Debug)]
pub struct Confirm {
    name: &'static str,
    direction: Direction,
    matcher: Probe,
    abort: Probe,
}

impl Confirm {
    pub fn new(name: &'static str, direction: Direction, matcher: Probe) -> Self {
        Self {
            name,
            direction,
            matcher,
            abort: Probe::Never,
        }
    }

    pub fn abort(mut self, abort: Probe) -> Self {
        self.abort = abort;
        self
    }
}

impl Demon for Confirm {
    fn name(&self) -> &str {
        self.name
    }

    fn run(&mut self, cx: &mut DemonContext<'_>) -> Step {
        match cx.search(self.direction, &self.matcher, &self.abort) {
            SearchOutcome::Found(_) => Step::Done,
            _ => Step::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SentenceContext;
    use crate::memory::{EpisodicMemory, WorkingMemory};
    use concept_graph::ConceptGraph;

    struct Fixture {
        graph: ConceptGraph,
        sentence: SentenceContext,
        working: WorkingMemory,
        episodic: EpisodicMemory,
    }

    impl Fixture {
        fn new(mode: Mode) -> Self {
            Self {
                graph: ConceptGraph::new(),
                sentence: SentenceContext::new(mode),
                working: WorkingMemory::default(),
                episodic: EpisodicMemory::new(),
            }
        }

        fn word(&mut self, token: &str, concept: ConceptId) -> usize {
            let index = self.sentence.push(token);
            if let Some(word) = self.sentence.word_mut(index) {
                word.holder.set_concept(concept);
            }
            index
        }

        fn run(&mut self, word: usize, demon: &mut dyn Demon) -> (Step, Vec<Box<dyn Demon>>) {
            let mut cx = DemonContext::new(
                &mut self.graph,
                &mut self.sentence,
                &mut self.working,
                &mut self.episodic,
                word,
            );
            let step = demon.run(&mut cx);
            (step, cx.take_spawned())
        }
    }

    #[test]
    fn test_fill_slot_binds_and_absorbs() {
        let mut fx = Fixture::new(Mode::Narrative);
        let john = fx.graph.add(HUMAN);
        let actor = VarId(0);
        let var = fx.graph.variable(actor);
        let kick = fx.graph.concept("PROPEL", [("actor", var)]);
        fx.word("John", john);
        let kicked = fx.word("kicked", kick);

        let mut demon = FillSlot::new("actor", actor, Direction::Before, Probe::head(HUMAN))
            .absorb(Absorb::Inside);
        let (step, _) = fx.run(kicked, &mut demon);

        assert_eq!(step, Step::Done);
        assert_eq!(fx.graph.value(kick, "actor"), Some(john));
        assert!(fx.sentence.word(0).unwrap().holder.flags().inside);
    }

    #[test]
    fn test_fill_slot_waits_then_lifts() {
        let mut fx = Fixture::new(Mode::Narrative);
        let object = VarId(0);
        let object_var = fx.graph.variable(object);
        let by = fx.graph.add("By");
        let prep = fx.graph.concept("Prep", [("type", by), ("object", object_var)]);
        let actor = VarId(1);
        let actor_var = fx.graph.variable(actor);
        let kick = fx.graph.concept("PROPEL", [("actor", actor_var)]);
        let kicked = fx.word("kicked", kick);
        fx.word("by", prep);

        let matcher = Probe::head("Prep");
        let mut demon = FillSlot::new("by-agent", actor, Direction::After, matcher)
            .lift("object")
            .absorb(Absorb::Ignore);

        let (step, _) = fx.run(kicked, &mut demon);
        assert_eq!(step, Step::Pending);

        let fred = fx.graph.add(HUMAN);
        fx.graph.bind(object, fred).unwrap();
        let (step, _) = fx.run(kicked, &mut demon);
        assert_eq!(step, Step::Done);
        assert_eq!(fx.graph.value(kick, "actor"), Some(fred));
        assert!(fx.sentence.word(1).unwrap().holder.flags().ignore);
    }

    #[test]
    fn test_fill_slot_chains_on_abort() {
        let mut fx = Fixture::new(Mode::Narrative);
        let passive = fx.graph.add("Passive");
        let var = fx.graph.variable(VarId(0));
        let kick = fx.graph.concept("PROPEL", [("actor", var)]);
        fx.word("was", passive);
        let kicked = fx.word("kicked", kick);

        let follow_up = FillSlot::new("by-agent", VarId(0), Direction::After, Probe::head(HUMAN));
        let mut demon = FillSlot::new("actor", VarId(0), Direction::Before, Probe::head(HUMAN))
            .abort(Probe::head("Passive"))
            .on_abort(OnAbort::Chain(vec![Box::new(follow_up)]));

        let (step, spawned) = fx.run(kicked, &mut demon);
        assert_eq!(step, Step::Done);
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].name(), "by-agent");
    }

    #[test]
    fn test_fill_slot_done_when_already_bound() {
        let mut fx = Fixture::new(Mode::Narrative);
        let ball = fx.graph.add(PHYS_OBJ);
        fx.graph.variable(VarId(0));
        fx.graph.bind(VarId(0), ball).unwrap();
        let word = fx.word("kicked", ball);

        let mut demon = FillSlot::new("thing", VarId(0), Direction::After, Probe::Any);
        assert_eq!(fx.run(word, &mut demon).0, Step::Done);
    }

    #[test]
    fn test_fill_slot_waits_for_unresolved_source() {
        let mut fx = Fixture::new(Mode::Narrative);
        let var = fx.graph.variable(VarId(0));
        let other = fx.graph.variable(VarId(1));
        fx.word("it", other);
        let verb = fx.word("dropped", var);

        let mut demon = FillSlot::new("thing", VarId(0), Direction::Before, Probe::Unresolved);
        let (step, _) = fx.run(verb, &mut demon);
        assert_eq!(step, Step::Pending);
        assert!(fx.graph.is_unbound(var));
    }

    #[test]
    fn test_mark_slot() {
        let mut fx = Fixture::new(Mode::Narrative);
        let def = fx.graph.add("Def");
        let ball = fx.graph.add(PHYS_OBJ);
        let the = fx.word("the", def);
        fx.word("ball", ball);

        let mut demon = MarkSlot::new("determiner", Direction::After, Probe::head(PHYS_OBJ), "ref", def);
        assert_eq!(fx.run(the, &mut demon).0, Step::Done);
        assert_eq!(fx.graph.value_name(ball, "ref"), Some("Def"));
    }

    #[test]
    fn test_resolve_reference_in_sentence() {
        let mut fx = Fixture::new(Mode::Narrative);
        let ball = fx.graph.add(PHYS_OBJ);
        let var = fx.graph.variable(VarId(0));
        fx.word("ball", ball);
        let it = fx.word("it", var);

        let mut demon = ResolveReference::new(VarId(0), Referent::Object);
        assert_eq!(fx.run(it, &mut demon).0, Step::Done);
        assert_eq!(fx.graph.resolve(var), Some(ball));
    }

    #[test]
    fn test_resolve_reference_from_working_memory() {
        let mut fx = Fixture::new(Mode::Narrative);
        let male = fx.graph.add("Male");
        let female = fx.graph.add("Female");
        let john = fx.graph.concept(HUMAN, [("gender", male)]);
        let mary = fx.graph.concept(HUMAN, [("gender", female)]);
        fx.working.finalize(&fx.graph, john);
        fx.working.finalize(&fx.graph, mary);

        let var = fx.graph.variable(VarId(0));
        let he = fx.word("He", var);
        let mut demon = ResolveReference::new(
            VarId(0),
            Referent::Character {
                gender: Some("Male".to_string()),
            },
        );
        assert_eq!(fx.run(he, &mut demon).0, Step::Done);
        assert_eq!(fx.graph.resolve(var), Some(john));
    }

    #[test]
    fn test_resolve_reference_from_episodic_memory() {
        let mut fx = Fixture::new(Mode::Query);
        let first = fx.graph.add("Sue");
        let female = fx.graph.add("Female");
        let sue = fx.graph.concept(HUMAN, [("firstName", first), ("gender", female)]);
        fx.episodic.find_or_create_character(&mut fx.graph, sue);

        let var = fx.graph.variable(VarId(0));
        let she = fx.word("she", var);
        let mut demon = ResolveReference::new(
            VarId(0),
            Referent::Character {
                gender: Some("Female".to_string()),
            },
        );
        assert_eq!(fx.run(she, &mut demon).0, Step::Done);
        let resolved = fx.graph.resolve(var).unwrap();
        assert_eq!(fx.graph.value_name(resolved, "firstName"), Some("Sue"));
    }

    #[test]
    fn test_unresolvable_reference_stays_pending() {
        let mut fx = Fixture::new(Mode::Narrative);
        let var = fx.graph.variable(VarId(0));
        let it = fx.word("it", var);

        let mut demon = ResolveReference::new(VarId(0), Referent::Object);
        assert_eq!(fx.run(it, &mut demon).0, Step::Pending);
        assert!(fx.graph.is_unbound(var));
    }

    #[test]
    fn test_confirm() {
        let mut fx = Fixture::new(Mode::Narrative);
        let atom = fx.graph.add("Passive");
        let was = fx.word("was", atom);
        let unknown = fx.graph.add("Unknown");
        fx.word("kicked", unknown);

        let mut participle = Confirm::new("participle", Direction::After, Probe::suffix("ed"))
            .abort(!Probe::suffix("ed"));
        let mut by = Confirm::new("by-follows", Direction::After, Probe::token("by"));

        assert_eq!(fx.run(was, &mut participle).0, Step::Done);
        assert_eq!(fx.run(was, &mut by).0, Step::Failed);
    }
}
