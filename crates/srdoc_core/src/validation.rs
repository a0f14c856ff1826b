//! Relationship/value compatibility rules.
//!
//! # Responsibility
//! - Hold the fixed table of legal source and target value kinds per
//!   relationship kind.
//! - Apply document-type limits on value kinds and by-reference edges.
//!
//! # Invariants
//! - Checks are pure: no document state is read or written here.
//! - A failed check yields a `CompatibilityDiagnostic`; whether it aborts the
//!   mutation is decided by the caller's `ValidationMode`.

use crate::model::item::NodeId;
use crate::model::kinds::{DocumentType, RelationshipType, ValueType};
use std::fmt::{Display, Formatter};

use crate::model::kinds::ValueType::{
    Code, Composite, Container, Date, DateTime, Num, PName, Text, Time, UidRef,
};

const ANY_VALUE: &[ValueType] = &ValueType::ALL;
const CONTAINER_ONLY: &[ValueType] = &[Container];
const OBSERVATION_SOURCES: &[ValueType] = &[Text, Code, Num];
const CONTEXT_TARGETS: &[ValueType] =
    &[Text, Code, Num, DateTime, Date, Time, UidRef, PName, Composite];
const ACQUISITION_TARGETS: &[ValueType] =
    &[Text, Code, Num, DateTime, Date, Time, UidRef, PName, Container];
const MODIFIER_TARGETS: &[ValueType] = &[Text, Code];
const NONE: &[ValueType] = &[];

/// Value kinds legal for the item a relationship originates from.
pub fn legal_source_value_types(relationship: RelationshipType) -> &'static [ValueType] {
    match relationship {
        RelationshipType::IsRoot => NONE,
        RelationshipType::Contains => CONTAINER_ONLY,
        RelationshipType::HasObsContext => &[Container, Text, Code, Num],
        RelationshipType::HasAcqContext => &[Container, Composite],
        RelationshipType::HasConceptMod => ANY_VALUE,
        RelationshipType::HasProperties => OBSERVATION_SOURCES,
        RelationshipType::InferredFrom => OBSERVATION_SOURCES,
        RelationshipType::SelectedFrom => &[Text, Code, Num, Composite],
    }
}

/// Value kinds legal for the item a relationship points to.
pub fn legal_target_value_types(relationship: RelationshipType) -> &'static [ValueType] {
    match relationship {
        RelationshipType::IsRoot => CONTAINER_ONLY,
        RelationshipType::Contains => ANY_VALUE,
        RelationshipType::HasObsContext => CONTEXT_TARGETS,
        RelationshipType::HasAcqContext => ACQUISITION_TARGETS,
        RelationshipType::HasConceptMod => MODIFIER_TARGETS,
        RelationshipType::HasProperties => ANY_VALUE,
        RelationshipType::InferredFrom => ANY_VALUE,
        RelationshipType::SelectedFrom => &[Composite],
    }
}

/// Why a relationship was judged incompatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncompatibilityReason {
    /// The originating item's value kind cannot carry this relationship.
    SourceValueType,
    /// The target item's value kind is not legal under this relationship.
    TargetValueType,
    /// The document type does not allow the target's value kind.
    DocumentTypeValue(DocumentType),
}

impl Display for IncompatibilityReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceValueType => write!(f, "source value type not allowed"),
            Self::TargetValueType => write!(f, "target value type not allowed"),
            Self::DocumentTypeValue(document_type) => {
                write!(f, "value type not allowed in {document_type} documents")
            }
        }
    }
}

/// Non-fatal report of a relationship/value mismatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompatibilityDiagnostic {
    /// Item the relationship originates from (parent or edge source).
    pub source: NodeId,
    /// Target item; `None` when strict mode refused to create it.
    pub target: Option<NodeId>,
    pub relationship: RelationshipType,
    pub source_value_type: ValueType,
    pub target_value_type: ValueType,
    pub by_reference: bool,
    pub reason: IncompatibilityReason,
}

impl Display for CompatibilityDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let edge = if self.by_reference { "by-reference" } else { "structural" };
        write!(
            f,
            "{} {} relationship {} -> {} ({}): {}",
            edge,
            self.relationship,
            self.source_value_type,
            self.target_value_type,
            match self.target {
                Some(target) => format!("items {} -> {}", self.source, target),
                None => format!("from item {}", self.source),
            },
            self.reason
        )
    }
}

/// Checks one relationship between a source and a target value kind.
pub fn check_relationship(
    document_type: DocumentType,
    source: ValueType,
    relationship: RelationshipType,
    target: ValueType,
) -> Result<(), IncompatibilityReason> {
    if !document_type.allows_value_type(target) {
        return Err(IncompatibilityReason::DocumentTypeValue(document_type));
    }
    if !legal_source_value_types(relationship).contains(&source) {
        return Err(IncompatibilityReason::SourceValueType);
    }
    if !legal_target_value_types(relationship).contains(&target) {
        return Err(IncompatibilityReason::TargetValueType);
    }
    Ok(())
}
