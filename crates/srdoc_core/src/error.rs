//! Builder error taxonomy.
//!
//! # Invariants
//! - Every failing builder call leaves node store, edge list and cursor unchanged.
//! - `IncompatibleRelationship` is only returned in strict validation mode;
//!   permissive mode records the diagnostic on the document instead.

use crate::model::coded::CodedEntryError;
use crate::model::item::NodeId;
use crate::model::kinds::{DocumentType, RelationshipType, ValueType};
use crate::model::value::ValueError;
use crate::validation::CompatibilityDiagnostic;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by builder and node store operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Coarse classification of a `TreeError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Tree shape violations: root cardinality, missing cursor, navigation.
    Structural,
    /// Unknown or illegal by-reference targets.
    Reference,
    /// Relationship/value kind mismatch.
    Compatibility,
    /// Template identification on a non-container.
    Scope,
    /// Malformed payload or coded entry.
    Value,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Reference => "reference",
            Self::Compatibility => "compatibility",
            Self::Scope => "scope",
            Self::Value => "value",
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from builder, cursor and node store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Non-root insertion or cursor-relative call with no current item.
    NoCurrentNode,
    /// A root already exists.
    InvalidRoot,
    /// Root must be a container.
    RootMustBeContainer(ValueType),
    /// Sibling insertion or upward move attempted at the root.
    AtRoot,
    /// Item has no children to descend into.
    NoChildren(NodeId),
    /// Item has no sibling in the requested direction.
    NoSibling(NodeId),
    /// Id was never created in this document.
    UnknownTarget(NodeId),
    /// Relationship kind cannot label a by-reference edge.
    InvalidEdgeKind(RelationshipType),
    /// By-reference edge from an item to itself.
    SelfReference(NodeId),
    /// Identical by-reference edge already recorded.
    DuplicateReference {
        source: NodeId,
        target: NodeId,
        relationship: RelationshipType,
    },
    /// Document type does not support by-reference edges.
    ByReferenceNotAllowed(DocumentType),
    /// Relationship/value mismatch in strict mode.
    IncompatibleRelationship(CompatibilityDiagnostic),
    /// Template identification on a non-container item.
    InvalidTemplateTarget {
        node: NodeId,
        value_type: ValueType,
    },
    /// Payload variant differs from the item's value kind.
    PayloadKindMismatch {
        node: NodeId,
        expected: ValueType,
        found: ValueType,
    },
    InvalidValue {
        node: NodeId,
        error: ValueError,
    },
    InvalidCodedEntry(CodedEntryError),
}

impl TreeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoCurrentNode
            | Self::InvalidRoot
            | Self::RootMustBeContainer(_)
            | Self::AtRoot
            | Self::NoChildren(_)
            | Self::NoSibling(_) => ErrorCategory::Structural,
            Self::UnknownTarget(_)
            | Self::InvalidEdgeKind(_)
            | Self::SelfReference(_)
            | Self::DuplicateReference { .. }
            | Self::ByReferenceNotAllowed(_) => ErrorCategory::Reference,
            Self::IncompatibleRelationship(_) => ErrorCategory::Compatibility,
            Self::InvalidTemplateTarget { .. } => ErrorCategory::Scope,
            Self::PayloadKindMismatch { .. }
            | Self::InvalidValue { .. }
            | Self::InvalidCodedEntry(_) => ErrorCategory::Value,
        }
    }
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCurrentNode => write!(f, "no current content item"),
            Self::InvalidRoot => write!(f, "document already has a root content item"),
            Self::RootMustBeContainer(value_type) => {
                write!(f, "root content item must be a container, got {value_type}")
            }
            Self::AtRoot => write!(f, "operation not possible at the root content item"),
            Self::NoChildren(id) => write!(f, "content item {id} has no children"),
            Self::NoSibling(id) => write!(f, "content item {id} has no such sibling"),
            Self::UnknownTarget(id) => write!(f, "content item not found: {id}"),
            Self::InvalidEdgeKind(relationship) => {
                write!(f, "relationship {relationship} cannot be used by reference")
            }
            Self::SelfReference(id) => {
                write!(f, "content item {id} cannot reference itself")
            }
            Self::DuplicateReference {
                source,
                target,
                relationship,
            } => write!(
                f,
                "by-reference {relationship} edge {source} -> {target} already exists"
            ),
            Self::ByReferenceNotAllowed(document_type) => write!(
                f,
                "{document_type} documents do not support by-reference relationships"
            ),
            Self::IncompatibleRelationship(diagnostic) => {
                write!(f, "incompatible relationship: {diagnostic}")
            }
            Self::InvalidTemplateTarget { node, value_type } => write!(
                f,
                "template identification requires a container, item {node} is {value_type}"
            ),
            Self::PayloadKindMismatch {
                node,
                expected,
                found,
            } => write!(
                f,
                "content item {node} holds {expected} values, got {found}"
            ),
            Self::InvalidValue { node, error } => {
                write!(f, "invalid value for content item {node}: {error}")
            }
            Self::InvalidCodedEntry(err) => write!(f, "invalid concept name: {err}"),
        }
    }
}

impl Error for TreeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue { error, .. } => Some(error),
            Self::InvalidCodedEntry(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCategory, TreeError};
    use crate::model::kinds::{DocumentType, RelationshipType};

    #[test]
    fn categories_follow_taxonomy() {
        assert_eq!(TreeError::InvalidRoot.category(), ErrorCategory::Structural);
        assert_eq!(TreeError::NoCurrentNode.category(), ErrorCategory::Structural);
        assert_eq!(TreeError::AtRoot.category(), ErrorCategory::Structural);
        assert_eq!(
            TreeError::UnknownTarget(9).category(),
            ErrorCategory::Reference
        );
        assert_eq!(
            TreeError::InvalidEdgeKind(RelationshipType::Contains).category(),
            ErrorCategory::Reference
        );
        assert_eq!(
            TreeError::ByReferenceNotAllowed(DocumentType::Enhanced).category(),
            ErrorCategory::Reference
        );
    }

    #[test]
    fn display_names_the_offending_item() {
        assert_eq!(
            TreeError::UnknownTarget(42).to_string(),
            "content item not found: 42"
        );
        assert!(TreeError::InvalidEdgeKind(RelationshipType::Contains)
            .to_string()
            .contains("contains"));
    }
}
