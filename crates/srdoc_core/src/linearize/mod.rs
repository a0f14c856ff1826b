//! Linearization of the content graph into an ordered record.
//!
//! # Responsibility
//! - Walk the structural tree depth-first (pre-order), siblings in order.
//! - Resolve by-reference edges to positions after the walk.
//! - Rebuild a document from a record (`restore`).
//!
//! # Invariants
//! - `linearize` never mutates the document; its visit map is discarded.
//! - The same document always yields the same record.

pub mod record;
pub mod restore;

use crate::document::Document;
use crate::model::item::NodeId;
use log::{error, info};
use record::{OrderedRecord, RecordEntry, ResolvedReference};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fatal linearization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearizeError {
    /// The document has no root item.
    EmptyDocument,
    /// A by-reference edge points at an item the traversal never reached.
    DanglingReference { source: NodeId, target: NodeId },
}

impl Display for LinearizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDocument => write!(f, "document has no root content item"),
            Self::DanglingReference { source, target } => write!(
                f,
                "by-reference edge {source} -> {target} does not resolve to a position"
            ),
        }
    }
}

impl Error for LinearizeError {}

/// Produces the ordered record of `document`.
pub fn linearize(document: &Document) -> Result<OrderedRecord, LinearizeError> {
    let nodes = document.nodes();
    let Some(root) = nodes.root() else {
        error!("event=linearize module=linearize status=error reason=empty_document");
        return Err(LinearizeError::EmptyDocument);
    };

    // positions[id - 1] == 0 means "not visited".
    let mut positions = vec![0usize; nodes.len()];
    let mut locations: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut entries = Vec::with_capacity(nodes.len());
    let mut stack: Vec<(NodeId, Option<usize>, Vec<usize>)> = vec![(root, None, vec![1])];

    while let Some((id, parent_position, location)) = stack.pop() {
        let Some(item) = nodes.get(id) else {
            continue;
        };
        let position = entries.len() + 1;
        positions[id - 1] = position;
        locations[id - 1] = location.clone();

        for (index, child) in item.children().iter().enumerate().rev() {
            let mut child_location = location.clone();
            child_location.push(index + 1);
            stack.push((*child, Some(position), child_location));
        }

        entries.push(RecordEntry {
            position,
            node_id: id,
            parent_position,
            location,
            relationship: item.relationship(),
            concept_name: item.concept_name().cloned(),
            template: item.template().cloned(),
            observation_date_time: item.observation_date_time().map(str::to_string),
            value: item.value().clone(),
            invalid: item.is_flagged_invalid(),
            references: Vec::new(),
        });
    }

    for edge in document.edges().iter() {
        let resolved = edge
            .target
            .checked_sub(1)
            .and_then(|index| positions.get(index).copied())
            .filter(|position| *position != 0);
        let source_position = edge
            .source
            .checked_sub(1)
            .and_then(|index| positions.get(index).copied())
            .filter(|position| *position != 0);
        let (Some(source_position), Some(target_position)) = (source_position, resolved) else {
            error!(
                "event=linearize module=linearize status=error reason=dangling_reference source={} target={}",
                edge.source, edge.target
            );
            return Err(LinearizeError::DanglingReference {
                source: edge.source,
                target: edge.target,
            });
        };
        entries[source_position - 1]
            .references
            .push(ResolvedReference {
                relationship: edge.relationship,
                target_position,
                target_location: locations[edge.target - 1].clone(),
            });
    }

    info!(
        "event=linearize module=linearize status=ok items={} references={}",
        entries.len(),
        document.edges().len()
    );
    Ok(OrderedRecord {
        metadata: document.metadata().clone(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::{linearize, LinearizeError};
    use crate::document::Document;
    use crate::model::kinds::{AddMode, DocumentType, RelationshipType, ValueType};
    use crate::store::ByReferenceEdge;

    #[test]
    fn empty_document_is_fatal() {
        let doc = Document::new(DocumentType::Comprehensive);
        assert_eq!(linearize(&doc), Err(LinearizeError::EmptyDocument));
    }

    #[test]
    fn unknown_edge_target_is_dangling() {
        let mut doc = Document::new(DocumentType::Comprehensive);
        let root = doc
            .add_content_item(RelationshipType::IsRoot, ValueType::Container, AddMode::default())
            .unwrap();
        doc.push_edge_unchecked(ByReferenceEdge {
            source: root,
            target: 7,
            relationship: RelationshipType::InferredFrom,
        });

        assert_eq!(
            linearize(&doc),
            Err(LinearizeError::DanglingReference {
                source: root,
                target: 7,
            })
        );
    }

    #[test]
    fn after_current_inserts_directly_behind_current() {
        let mut doc = Document::new(DocumentType::Comprehensive);
        doc.add_content_item(RelationshipType::IsRoot, ValueType::Container, AddMode::default())
            .unwrap();
        let a = doc
            .add_content_item(RelationshipType::Contains, ValueType::Text, AddMode::BelowCurrent)
            .unwrap();
        let c = doc
            .add_content_item(RelationshipType::Contains, ValueType::Text, AddMode::AfterCurrent)
            .unwrap();
        doc.goto_node(a).unwrap();
        let b = doc
            .add_content_item(RelationshipType::Contains, ValueType::Text, AddMode::AfterCurrent)
            .unwrap();

        let record = linearize(&doc).unwrap();
        let order: Vec<_> = record.entries.iter().map(|entry| entry.node_id).collect();
        assert_eq!(order, vec![1, a, b, c]);
        assert_eq!(record.entry(3).unwrap().location, vec![1, 2]);
        assert_eq!(record.position_of(c), Some(4));
    }
}
