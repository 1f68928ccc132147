//! Memory: per-run working memory and cross-sentence episodic memory.

mod episodic;
mod recency;
mod working;

pub use episodic::*;
pub use recency::*;
pub use working::*;
