//! Structured report document: content tree, by-reference edges and cursor.
//!
//! # Responsibility
//! - Own the node store, the edge list, the cursor and document metadata.
//! - Collect compatibility diagnostics reported in permissive mode.
//!
//! # Invariants
//! - Exactly one root, created first; every other item has a parent.
//! - Mutation goes through the cursor API in `cursor`, so every change is
//!   validated.
//! - A document is mutated by one owner; linearization only borrows it.

mod cursor;
pub mod metadata;

use crate::config::{DocumentConfig, ValidationMode};
use crate::model::item::{ContentItem, NodeId};
use crate::model::kinds::DocumentType;
use crate::store::{EdgeStore, NodeStore};
use crate::validation::{check_relationship, CompatibilityDiagnostic};
use metadata::DocumentMetadata;

/// One structured report under construction.
#[derive(Debug, Clone)]
pub struct Document {
    config: DocumentConfig,
    metadata: DocumentMetadata,
    nodes: NodeStore,
    edges: EdgeStore,
    cursor: Option<NodeId>,
    diagnostics: Vec<CompatibilityDiagnostic>,
}

impl Document {
    /// Creates an empty document of the given type with default settings.
    pub fn new(document_type: DocumentType) -> Self {
        Self::with_config(DocumentConfig::default().with_document_type(document_type))
    }

    /// Creates an empty document; metadata UIDs are generated here.
    pub fn with_config(config: DocumentConfig) -> Self {
        Self {
            metadata: DocumentMetadata::new(config.document_type),
            config,
            nodes: NodeStore::new(),
            edges: EdgeStore::new(),
            cursor: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn document_type(&self) -> DocumentType {
        self.config.document_type
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.config.validation_mode
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut DocumentMetadata {
        &mut self.metadata
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn edges(&self) -> &EdgeStore {
        &self.edges
    }

    /// Number of content items.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.nodes.root()
    }

    pub fn get(&self, id: NodeId) -> Option<&ContentItem> {
        self.nodes.get(id)
    }

    /// Diagnostics recorded while building in permissive mode.
    pub fn diagnostics(&self) -> &[CompatibilityDiagnostic] {
        &self.diagnostics
    }

    /// Whether no item or edge has been reported incompatible so far.
    pub fn is_valid(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Re-checks every structural and by-reference relationship.
    ///
    /// Returns all mismatches in tree order (items first, then edges)
    /// without touching recorded diagnostics.
    pub fn check_consistency(&self) -> Vec<CompatibilityDiagnostic> {
        let document_type = self.document_type();
        let mut found = Vec::new();

        for item in self.nodes.iter() {
            let Some(parent) = item.parent().and_then(|id| self.nodes.get(id)) else {
                continue;
            };
            if let Err(reason) = check_relationship(
                document_type,
                parent.value_type(),
                item.relationship(),
                item.value_type(),
            ) {
                found.push(CompatibilityDiagnostic {
                    source: parent.id(),
                    target: Some(item.id()),
                    relationship: item.relationship(),
                    source_value_type: parent.value_type(),
                    target_value_type: item.value_type(),
                    by_reference: false,
                    reason,
                });
            }
        }

        for edge in self.edges.iter() {
            let (Some(source), Some(target)) =
                (self.nodes.get(edge.source), self.nodes.get(edge.target))
            else {
                continue;
            };
            if let Err(reason) = check_relationship(
                document_type,
                source.value_type(),
                edge.relationship,
                target.value_type(),
            ) {
                found.push(CompatibilityDiagnostic {
                    source: edge.source,
                    target: Some(edge.target),
                    relationship: edge.relationship,
                    source_value_type: source.value_type(),
                    target_value_type: target.value_type(),
                    by_reference: true,
                    reason,
                });
            }
        }
        found
    }

    #[cfg(test)]
    pub(crate) fn push_edge_unchecked(&mut self, edge: crate::store::ByReferenceEdge) {
        self.edges.push(edge);
    }
}
