//! A small core vocabulary.
//!
//! Enough words to drive the engine end to end: names and titles, function
//! words, pronouns, a few objects and a few actions. Applications register
//! their own handlers on top of, or instead of, this set.

pub mod actions;
pub mod function_words;
pub mod names;
pub mod objects;

use crate::error::Result;
use crate::lexicon::Lexicon;

/// Lexicon with every core handler registered.
pub fn core_lexicon() -> Result<Lexicon> {
    let mut lexicon = Lexicon::new();
    function_words::register(&mut lexicon);
    names::register(&mut lexicon)?;
    objects::register(&mut lexicon);
    actions::register(&mut lexicon);
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_lexicon_loads() {
        let lexicon = core_lexicon().unwrap();
        assert!(!lexicon.is_empty());

        let was = lexicon.lookup(&["was", "kicked"]);
        assert_eq!(was.len(), 2);

        let picked = lexicon.lookup(&["picked", "up", "the", "ball"]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].handler.word(), "pick up");
    }
}
