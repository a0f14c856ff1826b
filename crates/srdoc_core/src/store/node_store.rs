//! Arena that owns every content item of one document.
//!
//! # Responsibility
//! - Assign ids sequentially from 1 and keep items addressable by id.
//! - Maintain parent pointers and ordered child lists (structural edges).
//! - Apply typed payload and concept name updates in place.
//!
//! # Invariants
//! - Item `n` lives at arena slot `n - 1`; id 0 is never handed out.
//! - Items are never removed, so ids are never reused.

use crate::error::{TreeError, TreeResult};
use crate::model::coded::CodedEntry;
use crate::model::item::{ContentItem, NodeId};
use crate::model::kinds::{RelationshipType, ValueType};
use crate::model::value::ContentValue;

/// Where a new item is placed in its parent's child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChildSlot {
    Last,
    After(NodeId),
    Before(NodeId),
}

/// In-memory content item arena.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    items: Vec<ContentItem>,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id != 0 && id <= self.items.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&ContentItem> {
        id.checked_sub(1).and_then(|index| self.items.get(index))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut ContentItem> {
        id.checked_sub(1).and_then(|index| self.items.get_mut(index))
    }

    /// Id of the root item; it is always the first item created.
    pub fn root(&self) -> Option<NodeId> {
        self.items.first().map(ContentItem::id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(ContentItem::parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(ContentItem::children).unwrap_or(&[])
    }

    /// Items in creation (id) order.
    pub fn iter(&self) -> impl Iterator<Item = &ContentItem> {
        self.items.iter()
    }

    /// Appends a new item and links it into `parent`'s child list.
    ///
    /// Callers guarantee `parent` exists and that a sibling named in `slot`
    /// is a child of `parent`.
    pub(crate) fn create(
        &mut self,
        relationship: RelationshipType,
        value_type: ValueType,
        parent: Option<(NodeId, ChildSlot)>,
    ) -> NodeId {
        let id = self.items.len() + 1;
        let parent_id = parent.map(|(parent_id, _)| parent_id);
        self.items
            .push(ContentItem::new(id, relationship, value_type, parent_id));

        if let Some((parent_id, slot)) = parent {
            if let Some(parent_item) = self.get_mut(parent_id) {
                let siblings = &mut parent_item.children;
                let index = match slot {
                    ChildSlot::Last => None,
                    ChildSlot::After(sibling) => siblings
                        .iter()
                        .position(|child| *child == sibling)
                        .map(|index| index + 1),
                    ChildSlot::Before(sibling) => {
                        siblings.iter().position(|child| *child == sibling)
                    }
                };
                match index {
                    Some(index) => siblings.insert(index, id),
                    None => siblings.push(id),
                }
            }
        }
        id
    }

    /// Replaces the payload of one item.
    ///
    /// The payload variant must match the item's value kind, and non-empty
    /// parts must be well formed.
    pub fn set_value(&mut self, id: NodeId, value: ContentValue) -> TreeResult<()> {
        let item = self.get_mut(id).ok_or(TreeError::UnknownTarget(id))?;
        let expected = item.value_type();
        let found = value.value_type();
        if expected != found {
            return Err(TreeError::PayloadKindMismatch {
                node: id,
                expected,
                found,
            });
        }
        value
            .validate()
            .map_err(|error| TreeError::InvalidValue { node: id, error })?;
        item.value = value;
        Ok(())
    }

    /// Sets the coded concept name of one item.
    pub fn set_concept_name(&mut self, id: NodeId, concept_name: CodedEntry) -> TreeResult<()> {
        concept_name
            .validate()
            .map_err(TreeError::InvalidCodedEntry)?;
        let item = self.get_mut(id).ok_or(TreeError::UnknownTarget(id))?;
        item.concept_name = Some(concept_name);
        Ok(())
    }
}
