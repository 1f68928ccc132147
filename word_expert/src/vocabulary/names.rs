//! Given names and titles, loaded from `data/names.toml`.

use serde::Deserialize;

use crate::context::{Direction, Probe};
use crate::demon::{Absorb, FillSlot, OnAbort};
use crate::error::{EngineError, Result};
use crate::heads::{
    slots::{FIRST_NAME, GENDER, LAST_NAME, WORD},
    HUMAN,
};
use crate::lexicon::{BuildContext, Lexicon, Sense, WordHandler};

const NAMES: &str = include_str!("../../data/names.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NameEntry {
    pub word: String,
    pub gender: String,
}

#[derive(Debug, Deserialize)]
struct NameTable {
    #[serde(default)]
    name: Vec<NameEntry>,
    #[serde(default)]
    title: Vec<NameEntry>,
}

/// A first name: `Human(firstName, gender, lastName: ?)`.
#[derive(Debug, Clone)]
pub struct GivenName(NameEntry);

/// A title such as "Mr": a Human with an empty first name.
#[derive(Debug, Clone)]
pub struct Title(NameEntry);

/// Parse a names table.
pub fn parse_names(source: &str) -> Result<(Vec<GivenName>, Vec<Title>)> {
    let table: NameTable = toml::from_str(source)?;
    if let Some(blank) = table
        .name
        .iter()
        .chain(&table.title)
        .find(|e| e.word.trim().is_empty() || e.gender.trim().is_empty())
    {
        return Err(EngineError::Vocabulary(format!(
            "name entry {:?} needs a word and a gender",
            blank.word
        )));
    }
    Ok((
        table.name.into_iter().map(GivenName).collect(),
        table.title.into_iter().map(Title).collect(),
    ))
}

pub fn register(lexicon: &mut Lexicon) -> Result<()> {
    let (names, titles) = parse_names(NAMES)?;
    for name in names {
        lexicon.register(name);
    }
    for title in titles {
        lexicon.register(title);
    }
    Ok(())
}

/// A Human whose last name is taken from a following capitalized unknown word.
fn person(cx: &mut BuildContext<'_>, first_name: &str, gender: &str) -> Sense {
    let first = cx.atom(first_name);
    let gender = cx.atom(gender);
    let (var, last) = cx.fresh_variable();
    let human = cx
        .graph
        .concept(HUMAN, [(FIRST_NAME, first), (GENDER, gender), (LAST_NAME, last)]);

    Sense::new(human).with_demon(
        FillSlot::new("last-name", var, Direction::After, Probe::ProperNoun)
            .abort(!Probe::ProperNoun)
            .lift(WORD)
            .absorb(Absorb::Inside)
            .on_abort(OnAbort::Fail),
    )
}

impl WordHandler for GivenName {
    fn word(&self) -> &str {
        &self.0.word
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        person(cx, &self.0.word, &self.0.gender)
    }
}

impl WordHandler for Title {
    fn word(&self) -> &str {
        &self.0.word
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        person(cx, "", &self.0.gender)
    }
}
