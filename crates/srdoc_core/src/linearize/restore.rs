//! Reader side: rebuild a document from an ordered record.
//!
//! Items are re-added in record order below their parent position. The record
//! must be in pre-order: each parent is still open on the ancestor path and
//! each location matches the rebuilt sibling ordinals. Edges are
//! re-added after all items exist, so forward references and cycles resolve.
//! The rebuilt document uses permissive validation; invalid flags are
//! recomputed rather than copied.

use super::record::OrderedRecord;
use crate::config::{DocumentConfig, ValidationMode};
use crate::document::Document;
use crate::error::TreeError;
use crate::model::item::NodeId;
use crate::model::kinds::{AddMode, RelationshipType};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Malformed record errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreError {
    EmptyRecord,
    NonContiguousPosition { expected: usize, found: usize },
    /// First entry is not a parentless root, or a later entry has no parent.
    MisplacedRoot { position: usize },
    /// Parent position is not an open ancestor, so the record is not in
    /// pre-order.
    InvalidParent { position: usize, parent: usize },
    /// Stored location differs from the sibling ordinals of the rebuilt tree.
    LocationMismatch { position: usize },
    UnresolvedReference { position: usize, target: usize },
    Tree(TreeError),
}

impl Display for RestoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRecord => write!(f, "record has no entries"),
            Self::NonContiguousPosition { expected, found } => {
                write!(f, "expected position {expected}, found {found}")
            }
            Self::MisplacedRoot { position } => {
                write!(f, "root must be the only parentless entry, see position {position}")
            }
            Self::InvalidParent { position, parent } => write!(
                f,
                "entry {position} names parent {parent}, which is not an open ancestor"
            ),
            Self::LocationMismatch { position } => write!(
                f,
                "entry {position} location does not match its place in the tree"
            ),
            Self::UnresolvedReference { position, target } => write!(
                f,
                "entry {position} references position {target} outside the record"
            ),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RestoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for RestoreError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

/// Rebuilds a document whose linearization reproduces `record`'s entries.
pub fn restore(record: &OrderedRecord) -> Result<Document, RestoreError> {
    if record.is_empty() {
        return Err(RestoreError::EmptyRecord);
    }

    let config = DocumentConfig {
        validation_mode: ValidationMode::Permissive,
        document_type: record.metadata.document_type(),
        log_level: None,
    };
    let mut document = Document::with_config(config);
    *document.metadata_mut() = record.metadata.clone();

    let mut ids: Vec<NodeId> = Vec::with_capacity(record.len());
    let mut locations: Vec<Vec<usize>> = Vec::with_capacity(record.len());
    // Open ancestor path as (position, children seen so far).
    let mut open: Vec<(usize, usize)> = Vec::new();
    for (index, entry) in record.entries.iter().enumerate() {
        let expected = index + 1;
        if entry.position != expected {
            return Err(RestoreError::NonContiguousPosition {
                expected,
                found: entry.position,
            });
        }

        let is_root = entry.relationship == RelationshipType::IsRoot;
        let (id, location) = match (index, entry.parent_position) {
            (0, None) if is_root => {
                let id = document.add_content_item(
                    RelationshipType::IsRoot,
                    entry.value_type(),
                    AddMode::BelowCurrent,
                )?;
                (id, vec![1])
            }
            (0, _) | (_, None) => {
                return Err(RestoreError::MisplacedRoot {
                    position: entry.position,
                })
            }
            (_, Some(parent)) => {
                while open.last().is_some_and(|(position, _)| *position != parent) {
                    open.pop();
                }
                let Some((_, seen)) = open.last_mut() else {
                    return Err(RestoreError::InvalidParent {
                        position: entry.position,
                        parent,
                    });
                };
                *seen += 1;
                let mut location = locations[parent - 1].clone();
                location.push(*seen);

                document.goto_node(ids[parent - 1])?;
                let id = document.add_content_item(
                    entry.relationship,
                    entry.value_type(),
                    AddMode::BelowCurrent,
                )?;
                (id, location)
            }
        };
        if entry.location != location {
            return Err(RestoreError::LocationMismatch {
                position: entry.position,
            });
        }
        open.push((entry.position, 0));

        document.set_value(entry.value.clone())?;
        if let Some(concept_name) = &entry.concept_name {
            document.set_concept_name(concept_name.clone())?;
        }
        if let Some(template) = &entry.template {
            document.set_template_identification(
                template.template_id.clone(),
                template.mapping_resource.clone(),
            )?;
        }
        if let Some(value) = &entry.observation_date_time {
            document.set_observation_date_time(value.clone())?;
        }
        ids.push(id);
        locations.push(location);
    }

    for entry in &record.entries {
        for reference in &entry.references {
            let target = reference
                .target_position
                .checked_sub(1)
                .and_then(|index| ids.get(index).copied())
                .ok_or(RestoreError::UnresolvedReference {
                    position: entry.position,
                    target: reference.target_position,
                })?;
            document.goto_node(ids[entry.position - 1])?;
            document.add_by_reference_relationship(reference.relationship, target)?;
        }
    }

    document.goto_root()?;
    info!(
        "event=restore module=linearize status=ok items={} diagnostics={}",
        document.len(),
        document.diagnostics().len()
    );
    Ok(document)
}
