//! Document-level metadata carried alongside the content tree.
//!
//! Description strings, patient fields and coding-scheme entries are opaque to
//! the core: stored unmodified and re-emitted with the ordered record. Only
//! instance UIDs are syntax-checked.

use crate::model::kinds::DocumentType;
use crate::model::uid::{generate_uid, is_valid_uid};
use crate::model::value::ValueError;
use serde::{Deserialize, Serialize};

/// Designator of the private coding scheme used for locally defined codes.
pub const PRIVATE_CODING_SCHEME_DESIGNATOR: &str = "99_SRDOC";
const PRIVATE_CODING_SCHEME_NAME: &str = "srdoc private coding scheme";
const PRIVATE_CODING_SCHEME_ORGANIZATION: &str = "srdoc";

/// One coding-scheme identification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingSchemeEntry {
    pub designator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_organization: Option<String>,
}

impl CodingSchemeEntry {
    pub fn new(designator: impl Into<String>) -> Self {
        Self {
            designator: designator.into(),
            registry: None,
            uid: None,
            name: None,
            responsible_organization: None,
        }
    }
}

/// Metadata of one structured report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    document_type: DocumentType,
    study_instance_uid: String,
    series_instance_uid: String,
    sop_instance_uid: String,
    pub study_description: Option<String>,
    pub series_description: Option<String>,
    pub patient_name: Option<String>,
    pub patient_sex: Option<String>,
    coding_schemes: Vec<CodingSchemeEntry>,
}

impl DocumentMetadata {
    /// Creates metadata with freshly generated instance UIDs.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            study_instance_uid: generate_uid(),
            series_instance_uid: generate_uid(),
            sop_instance_uid: generate_uid(),
            study_description: None,
            series_description: None,
            patient_name: None,
            patient_sex: None,
            coding_schemes: Vec::new(),
        }
    }

    /// Fixed at document creation.
    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn study_instance_uid(&self) -> &str {
        &self.study_instance_uid
    }

    pub fn series_instance_uid(&self) -> &str {
        &self.series_instance_uid
    }

    pub fn sop_instance_uid(&self) -> &str {
        &self.sop_instance_uid
    }

    pub fn set_study_instance_uid(&mut self, uid: impl Into<String>) -> Result<(), ValueError> {
        self.study_instance_uid = checked_uid(uid.into())?;
        Ok(())
    }

    pub fn set_series_instance_uid(&mut self, uid: impl Into<String>) -> Result<(), ValueError> {
        self.series_instance_uid = checked_uid(uid.into())?;
        Ok(())
    }

    pub fn set_sop_instance_uid(&mut self, uid: impl Into<String>) -> Result<(), ValueError> {
        self.sop_instance_uid = checked_uid(uid.into())?;
        Ok(())
    }

    pub fn set_study_description(&mut self, value: impl Into<String>) {
        self.study_description = Some(value.into());
    }

    pub fn set_series_description(&mut self, value: impl Into<String>) {
        self.series_description = Some(value.into());
    }

    pub fn set_patient_name(&mut self, value: impl Into<String>) {
        self.patient_name = Some(value.into());
    }

    pub fn set_patient_sex(&mut self, value: impl Into<String>) {
        self.patient_sex = Some(value.into());
    }

    pub fn coding_schemes(&self) -> &[CodingSchemeEntry] {
        &self.coding_schemes
    }

    /// Registers a coding scheme, replacing any entry with the same designator.
    pub fn add_coding_scheme(&mut self, entry: CodingSchemeEntry) {
        let existing = self
            .coding_schemes
            .iter()
            .position(|existing| existing.designator == entry.designator);
        match existing {
            Some(index) => self.coding_schemes[index] = entry,
            None => self.coding_schemes.push(entry),
        }
    }

    /// Registers the private coding scheme used for locally defined codes.
    pub fn add_private_coding_scheme(&mut self) {
        let mut entry = CodingSchemeEntry::new(PRIVATE_CODING_SCHEME_DESIGNATOR);
        entry.name = Some(PRIVATE_CODING_SCHEME_NAME.to_string());
        entry.responsible_organization = Some(PRIVATE_CODING_SCHEME_ORGANIZATION.to_string());
        self.add_coding_scheme(entry);
    }
}

fn checked_uid(uid: String) -> Result<String, ValueError> {
    if is_valid_uid(&uid) {
        Ok(uid)
    } else {
        Err(ValueError::InvalidUid(uid))
    }
}
