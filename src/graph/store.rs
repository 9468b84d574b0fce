//! Graph storage capability trait.
//!
//! The materializer issues structural mutations only through this minimal
//! surface: create node with label, find node by property equality, create
//! relationships with properties, enumerate relationships, and get/set
//! properties and labels. Nothing here assumes a richer query capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::{Properties, Value};

/// Opaque node handle issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Opaque relationship handle issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelId(pub u64);

/// Traversal direction relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

/// A relationship as seen from an enumeration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRef {
    pub id: RelId,
    pub rel_type: String,
    pub start: NodeId,
    pub end: NodeId,
}

impl RelationshipRef {
    /// The node on the far side of `node`, whichever endpoint that is.
    pub fn other(&self, node: NodeId) -> NodeId {
        if self.start == node {
            self.end
        } else {
            self.start
        }
    }
}

/// Minimal mutation capability over a labeled-property-graph store.
///
/// All calls run synchronously against the store inside whatever write scope
/// the caller already holds; implementations perform no internal locking
/// beyond their own data-structure safety.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Nodes
    // ========================================================================

    /// Create a node carrying a single initial label.
    async fn create_node(&self, label: &str) -> Result<NodeId>;

    /// Find one node by label and exact property equality.
    async fn find_node(&self, label: &str, key: &str, value: &Value) -> Result<Option<NodeId>>;

    /// Add a label to a node. Adding a label twice is a no-op.
    async fn add_label(&self, node: NodeId, label: &str) -> Result<()>;

    /// All labels on a node.
    async fn node_labels(&self, node: NodeId) -> Result<Vec<String>>;

    /// Set a node property, overwriting any previous value.
    async fn set_node_property(&self, node: NodeId, key: &str, value: Value) -> Result<()>;

    /// Read a node property.
    async fn node_property(&self, node: NodeId, key: &str) -> Result<Option<Value>>;

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Create a typed relationship carrying the given properties.
    async fn create_relationship(
        &self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
        properties: Properties,
    ) -> Result<RelId>;

    /// Set a relationship property, overwriting any previous value.
    async fn set_relationship_property(&self, rel: RelId, key: &str, value: Value) -> Result<()>;

    /// Read a relationship property.
    async fn relationship_property(&self, rel: RelId, key: &str) -> Result<Option<Value>>;

    /// Enumerate a node's relationships, optionally restricted by type.
    async fn relationships(
        &self,
        node: NodeId,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<RelationshipRef>>;
}
