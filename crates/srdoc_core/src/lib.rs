//! Structured report content graph.
//!
//! A document is a tree of typed content items built through a cursor, plus
//! by-reference edges that may form cycles. `linearize` turns it into an
//! ordered record with resolved positions for an external encoder.

pub mod config;
pub mod document;
pub mod error;
pub mod linearize;
pub mod logging;
pub mod model;
pub mod store;
pub mod validation;

pub use config::{ConfigError, DocumentConfig, ValidationMode};
pub use document::metadata::{CodingSchemeEntry, DocumentMetadata, PRIVATE_CODING_SCHEME_DESIGNATOR};
pub use document::Document;
pub use error::{ErrorCategory, TreeError, TreeResult};
pub use linearize::record::{OrderedRecord, RecordEntry, ResolvedReference};
pub use linearize::restore::{restore, RestoreError};
pub use linearize::{linearize, LinearizeError};
pub use logging::{default_log_level, init_logging, init_logging_with_config, logging_status};
pub use model::coded::{CodedEntry, CodedEntryError, TemplateIdentifier};
pub use model::item::{ContentItem, NodeId};
pub use model::kinds::{AddMode, DocumentType, RelationshipType, ValueType};
pub use model::value::{
    CompositeReference, ContentValue, ContinuityOfContent, NumericMeasurement, ValueError,
};
pub use store::{ByReferenceEdge, EdgeStore, NodeStore};
pub use validation::{CompatibilityDiagnostic, IncompatibilityReason};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
