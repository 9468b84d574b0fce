//! Graph persistence layer.
//!
//! A minimal [`GraphStore`] capability trait, an embedded in-memory
//! implementation, the fixed schema table, and the [`SentenceMaterializer`]
//! that projects annotated sentences into persistent graph structure.

mod materializer;
mod memory;
pub mod schema;
mod store;
mod value;

pub use materializer::{PersistOptions, SentenceMaterializer};
pub use memory::{GraphStats, MemoryGraphStore};
pub use store::{Direction, GraphStore, NodeId, RelId, RelationshipRef};
pub use value::{Properties, Value};
