//! Determiners, prepositions, pronouns, fillers and the two senses of "was".

use crate::context::{Direction, Probe, WordContext};
use crate::demon::{Absorb, Confirm, Demon, FillSlot, MarkSlot, Referent, ResolveReference};
use crate::heads::{
    slots::{OBJECT, REF, THING, TYPE, VALUE, WH, WORD},
    HUMAN, PASSIVE, PHYS_OBJ, PREP, STATE, UNKNOWN,
};
use crate::lexicon::{BuildContext, Lexicon, Sense, WordHandler};

pub fn register(lexicon: &mut Lexicon) {
    for word in ["and", "did", "do", "does", ".", "?", "!"] {
        lexicon.register(Filler(word));
    }
    lexicon.register(Determiner::new("the", "Def"));
    lexicon.register(Determiner::new("a", "Indef"));
    lexicon.register(Determiner::new("an", "Indef"));

    for (word, kind) in [("by", "By"), ("in", "In"), ("into", "Into"), ("on", "On")] {
        lexicon.register(Preposition { word, kind });
    }

    lexicon.register(Pronoun::new("it", Referent::Object));
    for (word, gender) in [("he", "Male"), ("him", "Male"), ("she", "Female"), ("her", "Female")] {
        lexicon.register(Pronoun::new(
            word,
            Referent::Character {
                gender: Some(gender.to_string()),
            },
        ));
    }
    lexicon.register(Who);

    // Copula first: it wins whenever nothing points at the passive.
    lexicon.register(Copula);
    lexicon.register(PassiveAux);
}

/// A word that contributes nothing to the output.
#[derive(Debug, Clone, Copy)]
pub struct Filler(pub &'static str);

impl WordHandler for Filler {
    fn word(&self) -> &str {
        self.0
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        Sense::new(cx.atom(self.0)).ignored()
    }
}

/// Marks the next physical object as definite or indefinite.
#[derive(Debug, Clone, Copy)]
pub struct Determiner {
    word: &'static str,
    reference: &'static str,
}

impl Determiner {
    pub fn new(word: &'static str, reference: &'static str) -> Self {
        Self { word, reference }
    }
}

impl WordHandler for Determiner {
    fn word(&self) -> &str {
        self.word
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let reference = cx.atom(self.reference);
        Sense::new(reference).ignored().with_demon(
            MarkSlot::new("determiner", Direction::After, Probe::head(PHYS_OBJ), REF, reference)
                .abort(Probe::head(PREP)),
        )
    }
}

/// `Prep(type, object)`, taking the next person or object as its object.
#[derive(Debug, Clone, Copy)]
pub struct Preposition {
    word: &'static str,
    kind: &'static str,
}

impl WordHandler for Preposition {
    fn word(&self) -> &str {
        self.word
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let kind = cx.atom(self.kind);
        let (var, object) = cx.fresh_variable();
        let prep = cx.graph.concept(PREP, [(TYPE, kind), (OBJECT, object)]);

        Sense::new(prep).with_demon(
            FillSlot::new(
                "prep-object",
                var,
                Direction::After,
                Probe::any_of([Probe::head(HUMAN), Probe::head(PHYS_OBJ)]),
            )
            .abort(Probe::head(PREP))
            .absorb(Absorb::Inside),
        )
    }
}

/// A placeholder resolved against the sentence and memory.
#[derive(Debug, Clone)]
pub struct Pronoun {
    word: &'static str,
    referent: Referent,
}

impl Pronoun {
    pub fn new(word: &'static str, referent: Referent) -> Self {
        Self { word, referent }
    }
}

impl WordHandler for Pronoun {
    fn word(&self) -> &str {
        self.word
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let (var, placeholder) = cx.fresh_variable();
        Sense::new(placeholder).with_demon(ResolveReference::new(var, self.referent.clone()))
    }
}

/// "who": a person to be found, `Human(wh: Who)`.
#[derive(Debug, Clone, Copy)]
pub struct Who;

impl WordHandler for Who {
    fn word(&self) -> &str {
        "who"
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let who = cx.atom("Who");
        Sense::new(cx.graph.concept(HUMAN, [(WH, who)]))
    }
}

/// "was" as a copula: `State(thing, value)`.
#[derive(Debug, Clone, Copy)]
pub struct Copula;

impl WordHandler for Copula {
    fn word(&self) -> &str {
        "was"
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let (thing_var, thing) = cx.fresh_variable();
        let (value_var, value) = cx.fresh_variable();
        let state = cx.graph.concept(STATE, [(THING, thing), (VALUE, value)]);

        Sense::new(state)
            .with_demon(
                FillSlot::new(
                    "state-thing",
                    thing_var,
                    Direction::Before,
                    Probe::any_of([Probe::head(HUMAN), Probe::head(PHYS_OBJ)]),
                )
                .absorb(Absorb::Inside),
            )
            .with_demon(
                FillSlot::new("state-value", value_var, Direction::After, Probe::head(UNKNOWN))
                    .lift(WORD)
                    .absorb(Absorb::Inside),
            )
    }
}

/// "was" as the passive auxiliary. Action words abort their actor search on it.
#[derive(Debug, Clone, Copy)]
pub struct PassiveAux;

impl WordHandler for PassiveAux {
    fn word(&self) -> &str {
        "was"
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        Sense::new(cx.atom(PASSIVE)).ignored()
    }

    fn disambiguation_demons(&self, _word: &WordContext) -> Vec<Box<dyn Demon>> {
        vec![
            Box::new(Confirm::new("by-follows", Direction::After, Probe::token("by"))),
            Box::new(
                Confirm::new("participle-follows", Direction::After, Probe::suffix("ed"))
                    .abort(!Probe::suffix("ed")),
            ),
        ]
    }
}
