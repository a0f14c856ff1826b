//! Content item (tree node) model.
//!
//! # Invariants
//! - `id` is assigned by the node store, starts at 1 and is never reused.
//! - `parent` is `None` only for the root, whose relationship is `IsRoot`.
//! - `children` keeps sibling order as linked by the builder.
//! - `template` is only ever set on container items.

use crate::model::coded::{CodedEntry, TemplateIdentifier};
use crate::model::kinds::{RelationshipType, ValueType};
use crate::model::value::ContentValue;

/// Stable identifier of a content item within one document.
///
/// Kept as a type alias so ids index the arena directly (`id - 1`).
pub type NodeId = usize;

/// One node of the document content tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub(crate) id: NodeId,
    pub(crate) relationship: RelationshipType,
    pub(crate) value: ContentValue,
    pub(crate) concept_name: Option<CodedEntry>,
    pub(crate) template: Option<TemplateIdentifier>,
    pub(crate) observation_date_time: Option<String>,
    pub(crate) invalid: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl ContentItem {
    pub(crate) fn new(
        id: NodeId,
        relationship: RelationshipType,
        value_type: ValueType,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            id,
            relationship,
            value: ContentValue::empty(value_type),
            concept_name: None,
            template: None,
            observation_date_time: None,
            invalid: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn relationship(&self) -> RelationshipType {
        self.relationship
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn value(&self) -> &ContentValue {
        &self.value
    }

    pub fn concept_name(&self) -> Option<&CodedEntry> {
        self.concept_name.as_ref()
    }

    pub fn template(&self) -> Option<&TemplateIdentifier> {
        self.template.as_ref()
    }

    pub fn observation_date_time(&self) -> Option<&str> {
        self.observation_date_time.as_deref()
    }

    /// Set when the validator reported this item as incompatible with its
    /// parent in permissive mode.
    pub fn is_flagged_invalid(&self) -> bool {
        self.invalid
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.relationship == RelationshipType::IsRoot
    }
}
