//! Coded concept names and template identification.
//!
//! # Invariants
//! - A valid `CodedEntry` has non-blank code value, scheme designator and meaning.
//! - Coding-scheme tables are not consulted here; entries are opaque triples.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Coded triple naming a concept: code value, scheme designator, meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodedEntry {
    pub code_value: String,
    pub coding_scheme_designator: String,
    /// Only needed when the designator alone is ambiguous.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coding_scheme_version: Option<String>,
    pub code_meaning: String,
}

impl CodedEntry {
    pub fn new(
        code_value: impl Into<String>,
        coding_scheme_designator: impl Into<String>,
        code_meaning: impl Into<String>,
    ) -> Self {
        Self {
            code_value: code_value.into(),
            coding_scheme_designator: coding_scheme_designator.into(),
            coding_scheme_version: None,
            code_meaning: code_meaning.into(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.coding_scheme_version = Some(version.into());
        self
    }

    /// Checks that all mandatory parts of the triple are present.
    pub fn validate(&self) -> Result<(), CodedEntryError> {
        if self.code_value.trim().is_empty() {
            return Err(CodedEntryError::EmptyCodeValue);
        }
        if self.coding_scheme_designator.trim().is_empty() {
            return Err(CodedEntryError::EmptyCodingSchemeDesignator);
        }
        if self.code_meaning.trim().is_empty() {
            return Err(CodedEntryError::EmptyCodeMeaning);
        }
        if matches!(&self.coding_scheme_version, Some(version) if version.trim().is_empty()) {
            return Err(CodedEntryError::EmptyCodingSchemeVersion);
        }
        Ok(())
    }
}

impl Display for CodedEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({},{},\"{}\")",
            self.code_value, self.coding_scheme_designator, self.code_meaning
        )
    }
}

/// Coded entry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodedEntryError {
    EmptyCodeValue,
    EmptyCodingSchemeDesignator,
    EmptyCodingSchemeVersion,
    EmptyCodeMeaning,
}

impl Display for CodedEntryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCodeValue => write!(f, "code value must not be blank"),
            Self::EmptyCodingSchemeDesignator => {
                write!(f, "coding scheme designator must not be blank")
            }
            Self::EmptyCodingSchemeVersion => {
                write!(f, "coding scheme version must not be blank when set")
            }
            Self::EmptyCodeMeaning => write!(f, "code meaning must not be blank"),
        }
    }
}

impl Error for CodedEntryError {}

/// Template identification attached to a container that opens a template scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateIdentifier {
    pub template_id: String,
    pub mapping_resource: String,
}

impl TemplateIdentifier {
    pub fn new(template_id: impl Into<String>, mapping_resource: impl Into<String>) -> Self {
        Self {
            template_id: template_id.into(),
            mapping_resource: mapping_resource.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.template_id.trim().is_empty() && !self.mapping_resource.trim().is_empty()
    }
}
