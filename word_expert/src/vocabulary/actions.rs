//! Action words and the conceptual dependency frames they build.
//!
//! Every action fills its actor from a person before it and its thing from
//! what follows. When the actor search runs into the passive auxiliary the
//! action switches voice: the actor comes from a following "by" phrase and
//! the thing from before the verb.

use concept_graph::{ConceptId, Pattern, VarId};

use crate::context::{Direction, Probe};
use crate::demon::{Absorb, FillSlot, OnAbort};
use crate::heads::{
    slots::{ACTOR, INSTRUMENT, OBJECT, THING, TO, TYPE},
    HUMAN, PASSIVE, PHYS_OBJ, PREP, STATE,
};
use crate::lexicon::{BuildContext, Lexicon, Sense, WordHandler};

pub const GRASP: &str = "GRASP";
pub const MOVE: &str = "MOVE";
pub const PTRANS: &str = "PTRANS";
pub const PROPEL: &str = "PROPEL";
pub const INGEST: &str = "INGEST";
pub const MARRY: &str = "MARRY";

/// Heads a thing search must not run past.
const CLAUSE_HEADS: [&str; 6] = [GRASP, PTRANS, PROPEL, INGEST, MARRY, STATE];

/// The frame an action word builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// `GRASP(actor, thing, instrument: MOVE(actor, thing: Hand, to: thing))`
    PickUp,
    /// `PTRANS(actor, thing, to, instrument: PROPEL(actor: Gravity, thing))`
    Drop,
    Kick,
    Ingest,
    Marry,
}

impl Frame {
    fn thing(self) -> &'static str {
        match self {
            Frame::Marry => HUMAN,
            _ => PHYS_OBJ,
        }
    }
}

pub fn register(lexicon: &mut Lexicon) {
    const REGULAR: &[&str] = &["", "s", "ed", "ing"];

    lexicon.register(ActionWord::new("pick up", REGULAR, Frame::PickUp));
    lexicon.register(ActionWord::new("drop", &["", "s", "ped", "ping"], Frame::Drop));
    lexicon.register(ActionWord::new("kick", REGULAR, Frame::Kick));
    lexicon.register(ActionWord::new("eat", &["", "s", "ing"], Frame::Ingest));
    lexicon.register(ActionWord::new("ate", &[""], Frame::Ingest));
    lexicon.register(ActionWord::new("marry", &[""], Frame::Marry));
    lexicon.register(ActionWord::new("married", &[""], Frame::Marry));
}

#[derive(Debug, Clone, Copy)]
pub struct ActionWord {
    word: &'static str,
    suffixes: &'static [&'static str],
    frame: Frame,
}

impl ActionWord {
    pub fn new(word: &'static str, suffixes: &'static [&'static str], frame: Frame) -> Self {
        Self {
            word,
            suffixes,
            frame,
        }
    }

    /// Build the frame. Frames with a destination also return its variable.
    fn skeleton(
        &self,
        cx: &mut BuildContext<'_>,
        actor: ConceptId,
        thing: ConceptId,
    ) -> (ConceptId, Option<VarId>) {
        match self.frame {
            Frame::PickUp => {
                let hand = cx.atom("Hand");
                let reach = cx
                    .graph
                    .concept(MOVE, [(ACTOR, actor), (THING, hand), (TO, thing)]);
                let grasp = cx
                    .graph
                    .concept(GRASP, [(ACTOR, actor), (THING, thing), (INSTRUMENT, reach)]);
                (grasp, None)
            }
            Frame::Drop => {
                let (to_var, to) = cx.fresh_variable();
                let gravity = cx.atom("Gravity");
                let fall = cx.graph.concept(PROPEL, [(ACTOR, gravity), (THING, thing)]);
                let ptrans = cx.graph.concept(
                    PTRANS,
                    [(ACTOR, actor), (THING, thing), (TO, to), (INSTRUMENT, fall)],
                );
                (ptrans, Some(to_var))
            }
            Frame::Kick => (cx.graph.concept(PROPEL, [(ACTOR, actor), (THING, thing)]), None),
            Frame::Ingest => (cx.graph.concept(INGEST, [(ACTOR, actor), (THING, thing)]), None),
            Frame::Marry => (cx.graph.concept(MARRY, [(ACTOR, actor), (THING, thing)]), None),
        }
    }
}

/// Actor before the verb, or after "by" once the passive shows up.
fn actor_demon(actor: VarId, thing: VarId, thing_head: &str) -> FillSlot {
    let by_agent = FillSlot::new(
        "by-agent",
        actor,
        Direction::After,
        Probe::concept(
            Pattern::head(PREP)
                .with_value(TYPE, "By")
                .with_bound(OBJECT),
        ),
    )
    .lift(OBJECT)
    .absorb(Absorb::Ignore);

    let passive_thing = FillSlot::new("passive-thing", thing, Direction::Before, Probe::head(thing_head))
        .absorb(Absorb::Inside);

    FillSlot::new("actor", actor, Direction::Before, Probe::head(HUMAN))
        .abort(Probe::head(PASSIVE))
        .absorb(Absorb::Inside)
        .on_abort(OnAbort::Chain(vec![Box::new(by_agent), Box::new(passive_thing)]))
}

fn clause_boundary() -> Probe {
    Probe::any_of(
        CLAUSE_HEADS
            .iter()
            .map(|head| Probe::head(*head))
            .chain([Probe::head(PREP)]),
    )
}

impl WordHandler for ActionWord {
    fn word(&self) -> &str {
        self.word
    }

    fn suffixes(&self) -> &[&'static str] {
        self.suffixes
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let (actor_var, actor) = cx.fresh_variable();
        let (thing_var, thing) = cx.fresh_variable();
        let thing_head = self.frame.thing();

        let (concept, destination) = self.skeleton(cx, actor, thing);
        let mut sense = Sense::new(concept)
            .with_demon(actor_demon(actor_var, thing_var, thing_head))
            .with_demon(
                FillSlot::new("thing", thing_var, Direction::After, Probe::head(thing_head))
                    .abort(clause_boundary())
                    .absorb(Absorb::Inside),
            );

        if let Some(to_var) = destination {
            let place = Probe::any_of(["In", "Into", "On"].map(|kind| {
                Probe::concept(Pattern::head(PREP).with_value(TYPE, kind).with_bound(OBJECT))
            }));
            let clauses = Probe::any_of(CLAUSE_HEADS.map(|head| Probe::head(head)));
            sense = sense.with_demon(
                FillSlot::new("destination", to_var, Direction::After, place)
                    .abort(clauses)
                    .lift(OBJECT)
                    .absorb(Absorb::Ignore),
            );
        }
        sense
    }
}
