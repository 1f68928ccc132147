use crate::heads::{slots::TYPE, PHYS_OBJ};
use crate::lexicon::{BuildContext, Lexicon, Sense, WordHandler};

pub fn register(lexicon: &mut Lexicon) {
    for (word, kind) in [
        ("ball", "Ball"),
        ("box", "Box"),
        ("apple", "Apple"),
        ("table", "Table"),
        ("lunch", "Lunch"),
    ] {
        lexicon.register(Noun { word, kind });
    }
}

/// A physical object: `PhysObj(type)`.
#[derive(Debug, Clone, Copy)]
pub struct Noun {
    word: &'static str,
    kind: &'static str,
}

impl WordHandler for Noun {
    fn word(&self) -> &str {
        self.word
    }

    fn suffixes(&self) -> &[&'static str] {
        &["", "s", "es"]
    }

    fn build(&self, cx: &mut BuildContext<'_>) -> Sense {
        let kind = cx.atom(self.kind);
        Sense::new(cx.graph.concept(PHYS_OBJ, [(TYPE, kind)]))
    }
}
