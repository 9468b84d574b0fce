//! In-memory graph store.
//!
//! Reference implementation of [`GraphStore`] backed by hash maps and
//! adjacency indexes behind a single `RwLock`. Used by tests and as the
//! embedded default; a server deployment substitutes its own store behind
//! the same trait.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{GraphError, Result};
use crate::graph::{Direction, GraphStore, NodeId, Properties, RelId, RelationshipRef, Value};

#[derive(Debug, Default)]
struct NodeData {
    labels: Vec<String>,
    properties: Properties,
}

#[derive(Debug)]
struct RelData {
    rel_type: String,
    start: NodeId,
    end: NodeId,
    properties: Properties,
}

/// Internal data storage structure.
#[derive(Debug, Default)]
struct GraphData {
    /// Nodes indexed by id.
    nodes: HashMap<u64, NodeData>,
    /// Relationships indexed by id.
    relationships: HashMap<u64, RelData>,
    /// Index: node id -> outgoing relationship ids.
    outgoing: HashMap<u64, Vec<u64>>,
    /// Index: node id -> incoming relationship ids.
    incoming: HashMap<u64, Vec<u64>>,
    next_node_id: u64,
    next_rel_id: u64,
}

/// Counts of what the store currently holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub node_count: usize,
    pub relationship_count: usize,
}

/// In-memory labeled-property-graph store.
#[derive(Default)]
pub struct MemoryGraphStore {
    data: RwLock<GraphData>,
}

impl MemoryGraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node and relationship counts.
    pub async fn stats(&self) -> GraphStats {
        let data = self.data.read().await;
        GraphStats {
            node_count: data.nodes.len(),
            relationship_count: data.relationships.len(),
        }
    }

    /// Number of nodes carrying the given label.
    pub async fn count_nodes_with_label(&self, label: &str) -> usize {
        let data = self.data.read().await;
        data.nodes
            .values()
            .filter(|n| n.labels.iter().any(|l| l == label))
            .count()
    }

    /// Number of relationships of the given type.
    pub async fn count_relationships_of_type(&self, rel_type: &str) -> usize {
        let data = self.data.read().await;
        data.relationships
            .values()
            .filter(|r| r.rel_type == rel_type)
            .count()
    }
}

impl GraphData {
    fn node(&self, id: NodeId) -> Result<&NodeData> {
        self.nodes
            .get(&id.0)
            .ok_or_else(|| GraphError::NodeNotFound(id.0).into())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.nodes
            .get_mut(&id.0)
            .ok_or_else(|| GraphError::NodeNotFound(id.0).into())
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    // ========================================================================
    // Nodes
    // ========================================================================

    async fn create_node(&self, label: &str) -> Result<NodeId> {
        let mut data = self.data.write().await;
        let id = data.next_node_id;
        data.next_node_id += 1;
        data.nodes.insert(
            id,
            NodeData {
                labels: vec![label.to_string()],
                properties: Properties::new(),
            },
        );
        Ok(NodeId(id))
    }

    async fn find_node(&self, label: &str, key: &str, value: &Value) -> Result<Option<NodeId>> {
        let data = self.data.read().await;
        Ok(data
            .nodes
            .iter()
            .find(|(_, node)| {
                node.labels.iter().any(|l| l == label) && node.properties.get(key) == Some(value)
            })
            .map(|(&id, _)| NodeId(id)))
    }

    async fn add_label(&self, node: NodeId, label: &str) -> Result<()> {
        let mut data = self.data.write().await;
        let node = data.node_mut(node)?;
        if !node.labels.iter().any(|l| l == label) {
            node.labels.push(label.to_string());
        }
        Ok(())
    }

    async fn node_labels(&self, node: NodeId) -> Result<Vec<String>> {
        let data = self.data.read().await;
        Ok(data.node(node)?.labels.clone())
    }

    async fn set_node_property(&self, node: NodeId, key: &str, value: Value) -> Result<()> {
        let mut data = self.data.write().await;
        data.node_mut(node)?.properties.insert(key.to_string(), value);
        Ok(())
    }

    async fn node_property(&self, node: NodeId, key: &str) -> Result<Option<Value>> {
        let data = self.data.read().await;
        Ok(data.node(node)?.properties.get(key).cloned())
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    async fn create_relationship(
        &self,
        from: NodeId,
        to: NodeId,
        rel_type: &str,
        properties: Properties,
    ) -> Result<RelId> {
        let mut data = self.data.write().await;
        data.node(from)?;
        data.node(to)?;

        let id = data.next_rel_id;
        data.next_rel_id += 1;
        data.relationships.insert(
            id,
            RelData {
                rel_type: rel_type.to_string(),
                start: from,
                end: to,
                properties,
            },
        );
        data.outgoing.entry(from.0).or_default().push(id);
        data.incoming.entry(to.0).or_default().push(id);
        Ok(RelId(id))
    }

    async fn set_relationship_property(&self, rel: RelId, key: &str, value: Value) -> Result<()> {
        let mut data = self.data.write().await;
        let rel = data
            .relationships
            .get_mut(&rel.0)
            .ok_or(GraphError::RelationshipNotFound(rel.0))?;
        rel.properties.insert(key.to_string(), value);
        Ok(())
    }

    async fn relationship_property(&self, rel: RelId, key: &str) -> Result<Option<Value>> {
        let data = self.data.read().await;
        let rel = data
            .relationships
            .get(&rel.0)
            .ok_or(GraphError::RelationshipNotFound(rel.0))?;
        Ok(rel.properties.get(key).cloned())
    }

    async fn relationships(
        &self,
        node: NodeId,
        direction: Direction,
        rel_type: Option<&str>,
    ) -> Result<Vec<RelationshipRef>> {
        let data = self.data.read().await;
        data.node(node)?;

        let mut rel_ids: Vec<u64> = Vec::new();
        if matches!(direction, Direction::Outgoing | Direction::Both) {
            rel_ids.extend(data.outgoing.get(&node.0).into_iter().flatten());
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            rel_ids.extend(data.incoming.get(&node.0).into_iter().flatten());
        }

        let mut result = Vec::new();
        for id in rel_ids {
            let rel = &data.relationships[&id];
            if rel_type.is_some_and(|t| t != rel.rel_type) {
                continue;
            }
            // A self-loop shows up once per direction; keep the first.
            if result.iter().any(|r: &RelationshipRef| r.id == RelId(id)) {
                continue;
            }
            result.push(RelationshipRef {
                id: RelId(id),
                rel_type: rel.rel_type.clone(),
                start: rel.start,
                end: rel.end,
            });
        }
        Ok(result)
    }
}
