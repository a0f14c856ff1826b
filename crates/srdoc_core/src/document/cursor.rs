//! Cursor-driven tree building.
//!
//! # Responsibility
//! - Insert items relative to the current item and move the cursor.
//! - Record by-reference edges from the current item.
//! - Gate every mutation through root, compatibility and template rules.
//!
//! # Invariants
//! - A failed call changes nothing: no item, no edge, no cursor move.
//! - The cursor is `None` only while the document has no root.
//! - Permissive mode never fails on compatibility; strict mode never records
//!   a diagnostic.

use super::Document;
use crate::error::{TreeError, TreeResult};
use crate::model::coded::{CodedEntry, TemplateIdentifier};
use crate::model::item::{ContentItem, NodeId};
use crate::model::kinds::{AddMode, RelationshipType, ValueType};
use crate::model::value::{validate_date_time, ContentValue, ValueError};
use crate::store::node_store::ChildSlot;
use crate::store::ByReferenceEdge;
use crate::validation::{check_relationship, CompatibilityDiagnostic};
use log::{debug, warn};

impl Document {
    /// Adds a content item and makes it the current item.
    ///
    /// The first call must add the root (`IsRoot`, container); `mode` is
    /// ignored for it. Later calls link the item per `mode`.
    ///
    /// # Errors
    /// - `InvalidRoot` when a root exists and `relationship` is `IsRoot`.
    /// - `RootMustBeContainer` when the root is not a container.
    /// - `NoCurrentNode` when no root exists yet.
    /// - `AtRoot` for sibling modes while the root is current.
    /// - `IncompatibleRelationship` in strict mode only.
    pub fn add_content_item(
        &mut self,
        relationship: RelationshipType,
        value_type: ValueType,
        mode: AddMode,
    ) -> TreeResult<NodeId> {
        if relationship == RelationshipType::IsRoot {
            return self.add_root(value_type);
        }

        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let (parent, slot) = match mode {
            AddMode::BelowCurrent => (current, ChildSlot::Last),
            AddMode::AfterCurrent => (
                self.nodes.parent(current).ok_or(TreeError::AtRoot)?,
                ChildSlot::After(current),
            ),
            AddMode::BeforeCurrent => (
                self.nodes.parent(current).ok_or(TreeError::AtRoot)?,
                ChildSlot::Before(current),
            ),
        };
        let parent_value_type = self.value_type_of(parent)?;

        let diagnostic = check_relationship(
            self.document_type(),
            parent_value_type,
            relationship,
            value_type,
        )
        .err()
        .map(|reason| CompatibilityDiagnostic {
            source: parent,
            target: None,
            relationship,
            source_value_type: parent_value_type,
            target_value_type: value_type,
            by_reference: false,
            reason,
        });

        if let Some(diagnostic) = &diagnostic {
            if self.validation_mode().is_strict() {
                warn!(
                    "event=add_item module=document status=rejected reason=incompatible relationship={} parent={} value_type={}",
                    relationship, parent, value_type
                );
                return Err(TreeError::IncompatibleRelationship(diagnostic.clone()));
            }
        }

        let id = self
            .nodes
            .create(relationship, value_type, Some((parent, slot)));
        self.cursor = Some(id);
        debug!(
            "event=add_item module=document status=ok id={} parent={} relationship={} value_type={}",
            id, parent, relationship, value_type
        );

        if let Some(mut diagnostic) = diagnostic {
            diagnostic.target = Some(id);
            if let Some(item) = self.nodes.get_mut(id) {
                item.invalid = true;
            }
            warn!(
                "event=add_item module=document status=flagged id={} detail=\"{}\"",
                id, diagnostic
            );
            self.diagnostics.push(diagnostic);
        }
        Ok(id)
    }

    fn add_root(&mut self, value_type: ValueType) -> TreeResult<NodeId> {
        if self.nodes.root().is_some() {
            return Err(TreeError::InvalidRoot);
        }
        if value_type != ValueType::Container {
            return Err(TreeError::RootMustBeContainer(value_type));
        }
        let id = self
            .nodes
            .create(RelationshipType::IsRoot, value_type, None);
        self.cursor = Some(id);
        debug!("event=add_root module=document status=ok id={id}");
        Ok(id)
    }

    /// Records a by-reference edge from the current item to `target`.
    ///
    /// The cursor does not move.
    pub fn add_by_reference_relationship(
        &mut self,
        relationship: RelationshipType,
        target: NodeId,
    ) -> TreeResult<()> {
        let source = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        if !relationship.is_legal_by_reference() {
            return Err(TreeError::InvalidEdgeKind(relationship));
        }
        if !self.document_type().allows_by_reference() {
            return Err(TreeError::ByReferenceNotAllowed(self.document_type()));
        }
        let target_value_type = self.value_type_of(target)?;
        if source == target {
            return Err(TreeError::SelfReference(source));
        }
        let edge = ByReferenceEdge {
            source,
            target,
            relationship,
        };
        if self.edges.contains(&edge) {
            return Err(TreeError::DuplicateReference {
                source,
                target,
                relationship,
            });
        }

        let source_value_type = self.value_type_of(source)?;
        if let Err(reason) = check_relationship(
            self.document_type(),
            source_value_type,
            relationship,
            target_value_type,
        ) {
            let diagnostic = CompatibilityDiagnostic {
                source,
                target: Some(target),
                relationship,
                source_value_type,
                target_value_type,
                by_reference: true,
                reason,
            };
            if self.validation_mode().is_strict() {
                warn!(
                    "event=add_reference module=document status=rejected reason=incompatible source={} target={}",
                    source, target
                );
                return Err(TreeError::IncompatibleRelationship(diagnostic));
            }
            warn!(
                "event=add_reference module=document status=flagged detail=\"{}\"",
                diagnostic
            );
            self.diagnostics.push(diagnostic);
        }

        self.edges.push(edge);
        debug!(
            "event=add_reference module=document status=ok source={} target={} relationship={}",
            source, target, relationship
        );
        Ok(())
    }

    /// Current item id, `None` while the document is empty.
    pub fn current(&self) -> Option<NodeId> {
        self.cursor
    }

    pub fn current_item(&self) -> Option<&ContentItem> {
        self.cursor.and_then(|id| self.nodes.get(id))
    }

    /// Moves the cursor to any existing item.
    pub fn goto_node(&mut self, id: NodeId) -> TreeResult<NodeId> {
        if !self.nodes.contains(id) {
            return Err(TreeError::UnknownTarget(id));
        }
        self.cursor = Some(id);
        Ok(id)
    }

    pub fn goto_root(&mut self) -> TreeResult<NodeId> {
        let root = self.nodes.root().ok_or(TreeError::NoCurrentNode)?;
        self.cursor = Some(root);
        Ok(root)
    }

    /// Moves the cursor to the structural parent of the current item.
    pub fn go_up(&mut self) -> TreeResult<NodeId> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let parent = self.nodes.parent(current).ok_or(TreeError::AtRoot)?;
        self.cursor = Some(parent);
        Ok(parent)
    }

    /// Moves the cursor to the first child of the current item.
    pub fn go_down(&mut self) -> TreeResult<NodeId> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let child = *self
            .nodes
            .children(current)
            .first()
            .ok_or(TreeError::NoChildren(current))?;
        self.cursor = Some(child);
        Ok(child)
    }

    /// Moves the cursor to the next sibling of the current item.
    pub fn goto_next(&mut self) -> TreeResult<NodeId> {
        self.goto_sibling(1)
    }

    /// Moves the cursor to the previous sibling of the current item.
    pub fn goto_previous(&mut self) -> TreeResult<NodeId> {
        self.goto_sibling(-1)
    }

    fn goto_sibling(&mut self, step: isize) -> TreeResult<NodeId> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let parent = self
            .nodes
            .parent(current)
            .ok_or(TreeError::NoSibling(current))?;
        let siblings = self.nodes.children(parent);
        let sibling = siblings
            .iter()
            .position(|child| *child == current)
            .and_then(|index| index.checked_add_signed(step))
            .and_then(|index| siblings.get(index).copied())
            .ok_or(TreeError::NoSibling(current))?;
        self.cursor = Some(sibling);
        Ok(sibling)
    }

    /// Sets the concept name of the current item.
    pub fn set_concept_name(&mut self, concept_name: CodedEntry) -> TreeResult<()> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        self.nodes.set_concept_name(current, concept_name)
    }

    /// Replaces the payload of the current item; the variant must match its
    /// value kind.
    pub fn set_value(&mut self, value: ContentValue) -> TreeResult<()> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        self.nodes.set_value(current, value)
    }

    /// Sets the payload of a string-valued current item (text, date, time,
    /// date-time, person name, UID reference).
    pub fn set_string_value(&mut self, value: impl Into<String>) -> TreeResult<()> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let value_type = self.value_type_of(current)?;
        let value = ContentValue::from_string(value_type, value).ok_or(
            TreeError::InvalidValue {
                node: current,
                error: ValueError::NotStringValued(value_type),
            },
        )?;
        self.nodes.set_value(current, value)
    }

    /// Marks the current container as opening a template scope.
    pub fn set_template_identification(
        &mut self,
        template_id: impl Into<String>,
        mapping_resource: impl Into<String>,
    ) -> TreeResult<()> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let value_type = self.value_type_of(current)?;
        if value_type != ValueType::Container {
            return Err(TreeError::InvalidTemplateTarget {
                node: current,
                value_type,
            });
        }
        let template = TemplateIdentifier::new(template_id, mapping_resource);
        if !template.is_valid() {
            return Err(TreeError::InvalidValue {
                node: current,
                error: ValueError::InvalidTemplateIdentifier,
            });
        }
        if let Some(item) = self.nodes.get_mut(current) {
            item.template = Some(template);
        }
        Ok(())
    }

    /// Sets the observation date-time of the current item.
    pub fn set_observation_date_time(&mut self, value: impl Into<String>) -> TreeResult<()> {
        let current = self.cursor.ok_or(TreeError::NoCurrentNode)?;
        let value = value.into();
        validate_date_time(&value).map_err(|error| TreeError::InvalidValue {
            node: current,
            error,
        })?;
        if let Some(item) = self.nodes.get_mut(current) {
            item.observation_date_time = Some(value);
        }
        Ok(())
    }

    fn value_type_of(&self, id: NodeId) -> TreeResult<ValueType> {
        self.nodes
            .get(id)
            .map(ContentItem::value_type)
            .ok_or(TreeError::UnknownTarget(id))
    }
}
