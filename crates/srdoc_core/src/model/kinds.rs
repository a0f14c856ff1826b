//! Closed enumerations that classify content items and edges.
//!
//! # Responsibility
//! - Name every relationship kind, value kind, insertion mode and document type.
//! - Provide stable string ids (`as_str`) and strict parsers for configuration.
//!
//! # Invariants
//! - `IsRoot` is only ever carried by the single root item.
//! - `Contains` is structural-only and never legal for by-reference edges.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Semantic link between an item and its structural parent, or the kind of a
/// by-reference edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Relationship of the document root. Has no parent.
    IsRoot,
    Contains,
    HasObsContext,
    HasAcqContext,
    HasConceptMod,
    HasProperties,
    InferredFrom,
    SelectedFrom,
}

impl RelationshipType {
    /// All relationship kinds in declaration order.
    pub const ALL: [RelationshipType; 8] = [
        Self::IsRoot,
        Self::Contains,
        Self::HasObsContext,
        Self::HasAcqContext,
        Self::HasConceptMod,
        Self::HasProperties,
        Self::InferredFrom,
        Self::SelectedFrom,
    ];

    /// Stable string id used in configuration and records.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IsRoot => "is_root",
            Self::Contains => "contains",
            Self::HasObsContext => "has_obs_context",
            Self::HasAcqContext => "has_acq_context",
            Self::HasConceptMod => "has_concept_mod",
            Self::HasProperties => "has_properties",
            Self::InferredFrom => "inferred_from",
            Self::SelectedFrom => "selected_from",
        }
    }

    /// Defined term an encoder writes for this relationship.
    ///
    /// Returns `None` for `IsRoot`, which is never encoded.
    pub fn defined_term(self) -> Option<&'static str> {
        match self {
            Self::IsRoot => None,
            Self::Contains => Some("CONTAINS"),
            Self::HasObsContext => Some("HAS OBS CONTEXT"),
            Self::HasAcqContext => Some("HAS ACQ CONTEXT"),
            Self::HasConceptMod => Some("HAS CONCEPT MOD"),
            Self::HasProperties => Some("HAS PROPERTIES"),
            Self::InferredFrom => Some("INFERRED FROM"),
            Self::SelectedFrom => Some("SELECTED FROM"),
        }
    }

    /// Whether this kind may label a by-reference edge.
    ///
    /// Containment and concept modifiers must be structural, and the root
    /// relationship is unique.
    pub fn is_legal_by_reference(self) -> bool {
        !matches!(self, Self::IsRoot | Self::Contains | Self::HasConceptMod)
    }
}

impl Display for RelationshipType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one relationship kind from its stable string id.
pub fn parse_relationship_type(value: &str) -> Result<RelationshipType, KindParseError> {
    let normalized = value.trim();
    RelationshipType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == normalized)
        .ok_or_else(|| KindParseError::new("relationship type", normalized))
}

/// Closed set of payload shapes an item may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Text,
    Code,
    Num,
    Date,
    Time,
    DateTime,
    PName,
    UidRef,
    Composite,
    Container,
}

impl ValueType {
    /// All value kinds in declaration order.
    pub const ALL: [ValueType; 10] = [
        Self::Text,
        Self::Code,
        Self::Num,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::PName,
        Self::UidRef,
        Self::Composite,
        Self::Container,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Code => "code",
            Self::Num => "num",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "date_time",
            Self::PName => "p_name",
            Self::UidRef => "uid_ref",
            Self::Composite => "composite",
            Self::Container => "container",
        }
    }

    /// Defined term an encoder writes for this value kind.
    pub fn defined_term(self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Code => "CODE",
            Self::Num => "NUM",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::PName => "PNAME",
            Self::UidRef => "UIDREF",
            Self::Composite => "COMPOSITE",
            Self::Container => "CONTAINER",
        }
    }

    /// Whether the payload of this kind is a single string.
    pub fn is_string_valued(self) -> bool {
        matches!(
            self,
            Self::Text | Self::Date | Self::Time | Self::DateTime | Self::PName | Self::UidRef
        )
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one value kind from its stable string id.
pub fn parse_value_type(value: &str) -> Result<ValueType, KindParseError> {
    let normalized = value.trim();
    ValueType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == normalized)
        .ok_or_else(|| KindParseError::new("value type", normalized))
}

/// Where a new item is linked relative to the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    /// Next sibling of the current item.
    #[default]
    AfterCurrent,
    /// Last child of the current item.
    BelowCurrent,
    /// Previous sibling of the current item.
    BeforeCurrent,
}

/// Document class, which bounds the value kinds and edges a tree may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Text-only report: no numeric values, no by-reference edges.
    BasicText,
    /// Adds numeric measurements; still no by-reference edges.
    Enhanced,
    /// Full tree plus by-reference edges.
    #[default]
    Comprehensive,
}

impl DocumentType {
    pub const ALL: [DocumentType; 3] = [Self::BasicText, Self::Enhanced, Self::Comprehensive];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BasicText => "basic_text",
            Self::Enhanced => "enhanced",
            Self::Comprehensive => "comprehensive",
        }
    }

    pub fn allows_by_reference(self) -> bool {
        matches!(self, Self::Comprehensive)
    }

    pub fn allows_value_type(self, value_type: ValueType) -> bool {
        match self {
            Self::BasicText => value_type != ValueType::Num,
            Self::Enhanced | Self::Comprehensive => true,
        }
    }
}

impl Display for DocumentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses one document type from its stable string id.
pub fn parse_document_type(value: &str) -> Result<DocumentType, KindParseError> {
    let normalized = value.trim();
    DocumentType::ALL
        .into_iter()
        .find(|kind| kind.as_str() == normalized)
        .ok_or_else(|| KindParseError::new("document type", normalized))
}

/// Unknown string id for one of the closed enumerations above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindParseError {
    pub kind: &'static str,
    pub value: String,
}

impl KindParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl Display for KindParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unsupported {}: `{}`", self.kind, self.value)
    }
}

impl Error for KindParseError {}

#[cfg(test)]
mod tests {
    use super::{
        parse_document_type, parse_relationship_type, parse_value_type, DocumentType,
        RelationshipType, ValueType,
    };

    #[test]
    fn parses_every_relationship_id() {
        for kind in RelationshipType::ALL {
            assert_eq!(parse_relationship_type(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn rejects_defined_terms_as_ids() {
        let err = parse_relationship_type("CONTAINS").expect_err("terms are not ids");
        assert_eq!(err.value, "CONTAINS");
        assert!(err.to_string().contains("relationship type"));
    }

    #[test]
    fn value_type_ids_trim_whitespace() {
        assert_eq!(parse_value_type(" uid_ref "), Ok(ValueType::UidRef));
        assert!(parse_value_type("image").is_err());
    }

    #[test]
    fn containment_is_structural_only() {
        assert!(!RelationshipType::Contains.is_legal_by_reference());
        assert!(!RelationshipType::IsRoot.is_legal_by_reference());
        assert!(!RelationshipType::HasConceptMod.is_legal_by_reference());
        assert!(RelationshipType::InferredFrom.is_legal_by_reference());
        assert!(RelationshipType::SelectedFrom.is_legal_by_reference());
    }

    #[test]
    fn document_type_constraints() {
        assert!(!DocumentType::BasicText.allows_value_type(ValueType::Num));
        assert!(DocumentType::Enhanced.allows_value_type(ValueType::Num));
        assert!(!DocumentType::Enhanced.allows_by_reference());
        assert!(DocumentType::Comprehensive.allows_by_reference());
        assert_eq!(parse_document_type("enhanced"), Ok(DocumentType::Enhanced));
    }
}
