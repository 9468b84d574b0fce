//! Configuration loading and validation.

mod settings;

pub use settings::{CacheConfig, Config, EnrichmentConfig, OntologyConfig};
