//! Concept heads and slot names the engine itself relies on.

pub const HUMAN: &str = "Human";
pub const PHYS_OBJ: &str = "PhysObj";
pub const UNKNOWN: &str = "Unknown";
pub const PREP: &str = "Prep";
pub const PASSIVE: &str = "Passive";
pub const STATE: &str = "State";

/// Slot names.
pub mod slots {
    pub const ACTOR: &str = "actor";
    pub const THING: &str = "thing";
    pub const TO: &str = "to";
    pub const INSTRUMENT: &str = "instrument";
    pub const OBJECT: &str = "object";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const VALUE: &str = "value";
    pub const WORD: &str = "word";
    pub const WH: &str = "wh";

    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const GENDER: &str = "gender";
    pub const ROLE: &str = "role";
    pub const INSTANCE: &str = "instance";
}
