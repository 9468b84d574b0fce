//! In-memory linguistic annotation model.
//!
//! Pure data structures produced by an upstream NLP pipeline: one
//! [`Sentence`] per call, holding its [`Tag`] arena, located [`Occurrence`]s
//! and [`PhraseOccurrence`]s, [`TypedDependency`] edges, and a sentence-level
//! [`SentimentLevel`]. No I/O, no state beyond the sentence itself.

mod dependency;
mod occurrence;
mod phrase;
mod sentence;
mod sentiment;
mod tag;

pub use dependency::{TypedDependency, ROOT_RELATION};
pub use occurrence::{Occurrence, OccurrenceRef, PhraseOccurrence, Span};
pub use phrase::Phrase;
pub use sentence::Sentence;
pub use sentiment::SentimentLevel;
pub use tag::{ParentLink, Tag, TagId};
