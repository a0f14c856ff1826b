//! By-reference edge list.
//!
//! Edges are plain id triples. They carry no ownership, do not take part in
//! structural traversal, and may form cycles.

use crate::model::item::NodeId;
use crate::model::kinds::RelationshipType;
use serde::{Deserialize, Serialize};

/// Non-structural edge from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByReferenceEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub relationship: RelationshipType,
}

/// Insertion-ordered list of by-reference edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeStore {
    edges: Vec<ByReferenceEdge>,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ByReferenceEdge> {
        self.edges.iter()
    }

    pub fn contains(&self, edge: &ByReferenceEdge) -> bool {
        self.edges.contains(edge)
    }

    /// Edges leaving `source`, in insertion order.
    pub fn outgoing(&self, source: NodeId) -> impl Iterator<Item = &ByReferenceEdge> {
        self.edges.iter().filter(move |edge| edge.source == source)
    }

    /// Edges arriving at `target`, in insertion order.
    pub fn incoming(&self, target: NodeId) -> impl Iterator<Item = &ByReferenceEdge> {
        self.edges.iter().filter(move |edge| edge.target == target)
    }

    pub(crate) fn push(&mut self, edge: ByReferenceEdge) {
        self.edges.push(edge);
    }
}

#[cfg(test)]
mod tests {
    use super::{ByReferenceEdge, EdgeStore};
    use crate::model::kinds::RelationshipType;

    #[test]
    fn outgoing_and_incoming_filter_by_endpoint() {
        let mut edges = EdgeStore::new();
        edges.push(ByReferenceEdge {
            source: 2,
            target: 3,
            relationship: RelationshipType::InferredFrom,
        });
        edges.push(ByReferenceEdge {
            source: 3,
            target: 2,
            relationship: RelationshipType::InferredFrom,
        });
        edges.push(ByReferenceEdge {
            source: 2,
            target: 1,
            relationship: RelationshipType::HasProperties,
        });

        let targets: Vec<_> = edges.outgoing(2).map(|edge| edge.target).collect();
        assert_eq!(targets, vec![3, 1]);
        let sources: Vec<_> = edges.incoming(2).map(|edge| edge.source).collect();
        assert_eq!(sources, vec![3]);
        assert_eq!(edges.len(), 3);
    }
}
