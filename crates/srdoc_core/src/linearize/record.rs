//! Ordered record handed to an external encoder.
//!
//! # Invariants
//! - `entries[i].position == i + 1`.
//! - A parent's position is always smaller than its child's.
//! - References hold positions only, so cycles need no ownership.

use crate::document::metadata::DocumentMetadata;
use crate::model::coded::{CodedEntry, TemplateIdentifier};
use crate::model::item::NodeId;
use crate::model::kinds::{RelationshipType, ValueType};
use crate::model::value::ContentValue;
use serde::{Deserialize, Serialize};

/// By-reference edge resolved against traversal positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedReference {
    pub relationship: RelationshipType,
    pub target_position: usize,
    /// Sibling ordinals from the root down to the target, e.g. `[1, 2]`.
    pub target_location: Vec<usize>,
}

/// One content item in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    /// 1-based rank in depth-first pre-order.
    pub position: usize,
    /// Id the item had in the source document.
    pub node_id: NodeId,
    pub parent_position: Option<usize>,
    /// Sibling ordinals from the root down to this item; the root is `[1]`.
    pub location: Vec<usize>,
    pub relationship: RelationshipType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_name: Option<CodedEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_date_time: Option<String>,
    pub value: ContentValue,
    #[serde(default)]
    pub invalid: bool,
    #[serde(default)]
    pub references: Vec<ResolvedReference>,
}

impl RecordEntry {
    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    /// Dotted form of `location`, e.g. `1.2.3`.
    pub fn location_string(&self) -> String {
        format_location(&self.location)
    }
}

/// Linearized document: metadata plus items in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedRecord {
    pub metadata: DocumentMetadata,
    pub entries: Vec<RecordEntry>,
}

impl OrderedRecord {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a 1-based position.
    pub fn entry(&self, position: usize) -> Option<&RecordEntry> {
        position
            .checked_sub(1)
            .and_then(|index| self.entries.get(index))
    }

    /// Position assigned to a source document item.
    pub fn position_of(&self, node_id: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.node_id == node_id)
            .map(|entry| entry.position)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Joins sibling ordinals with dots.
pub fn format_location(location: &[usize]) -> String {
    location
        .iter()
        .map(|ordinal| ordinal.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::format_location;

    #[test]
    fn format_location_joins_with_dots() {
        assert_eq!(format_location(&[1, 2, 3]), "1.2.3");
        assert_eq!(format_location(&[1]), "1");
        assert_eq!(format_location(&[]), "");
    }
}
