use srdoc_core::{
    AddMode, CodedEntry, ContentValue, Document, DocumentConfig, DocumentType, ErrorCategory,
    IncompatibilityReason, NodeId, RelationshipType, TreeError, ValidationMode, ValueType,
};

fn document_with(config: DocumentConfig) -> Document {
    let mut doc = Document::with_config(config);
    doc.add_content_item(RelationshipType::IsRoot, ValueType::Container, AddMode::default())
        .unwrap();
    doc
}

fn text_child(doc: &mut Document) -> NodeId {
    doc.add_content_item(RelationshipType::Contains, ValueType::Text, AddMode::BelowCurrent)
        .unwrap()
}

#[test]
fn strict_mode_refuses_incompatible_item() {
    let mut doc = document_with(DocumentConfig::strict());
    let text = text_child(&mut doc);

    // Only containers may contain other items.
    let err = doc
        .add_content_item(RelationshipType::Contains, ValueType::Text, AddMode::BelowCurrent)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Compatibility);
    let TreeError::IncompatibleRelationship(diagnostic) = err else {
        panic!("expected compatibility error");
    };
    assert_eq!(diagnostic.source, text);
    assert_eq!(diagnostic.reason, IncompatibilityReason::SourceValueType);

    assert_eq!(doc.len(), 2);
    assert_eq!(doc.current(), Some(text));
    assert!(doc.diagnostics().is_empty());
}

#[test]
fn permissive_mode_inserts_and_flags() {
    let mut doc = document_with(DocumentConfig::default());
    assert_eq!(doc.validation_mode(), ValidationMode::Permissive);
    text_child(&mut doc);

    let flagged = doc
        .add_content_item(
            RelationshipType::HasConceptMod,
            ValueType::Num,
            AddMode::BelowCurrent,
        )
        .unwrap();

    assert!(doc.get(flagged).unwrap().is_flagged_invalid());
    assert!(!doc.is_valid());
    assert_eq!(doc.diagnostics().len(), 1);
    let diagnostic = &doc.diagnostics()[0];
    assert_eq!(diagnostic.target, Some(flagged));
    assert_eq!(diagnostic.reason, IncompatibilityReason::TargetValueType);
    assert!(!diagnostic.by_reference);
}

#[test]
fn by_reference_compatibility_follows_the_mode() {
    let mut strict = document_with(DocumentConfig::strict());
    let root = strict.root().unwrap();
    text_child(&mut strict);
    // Selected-from must point at a composite.
    assert!(matches!(
        strict.add_by_reference_relationship(RelationshipType::SelectedFrom, root),
        Err(TreeError::IncompatibleRelationship(_))
    ));
    assert!(strict.edges().is_empty());

    let mut permissive = document_with(DocumentConfig::default());
    let root = permissive.root().unwrap();
    text_child(&mut permissive);
    permissive
        .add_by_reference_relationship(RelationshipType::SelectedFrom, root)
        .unwrap();
    assert_eq!(permissive.edges().len(), 1);
    assert!(permissive.diagnostics()[0].by_reference);
}

#[test]
fn template_identification_requires_container() {
    let mut doc = document_with(DocumentConfig::default());
    doc.set_template_identification("2000", "DCMR").unwrap();
    let text = text_child(&mut doc);

    let err = doc.set_template_identification("2000", "DCMR").unwrap_err();
    assert_eq!(
        err,
        TreeError::InvalidTemplateTarget {
            node: text,
            value_type: ValueType::Text,
        }
    );
    assert_eq!(err.category(), ErrorCategory::Scope);
    assert!(doc.get(text).unwrap().template().is_none());
    assert_eq!(doc.get(1).unwrap().template().unwrap().template_id, "2000");

    doc.goto_root().unwrap();
    assert!(doc.set_template_identification("", "DCMR").is_err());
}

#[test]
fn restricted_document_types_forbid_by_reference_edges() {
    for document_type in [DocumentType::BasicText, DocumentType::Enhanced] {
        let mut doc =
            document_with(DocumentConfig::default().with_document_type(document_type));
        let root = doc.root().unwrap();
        text_child(&mut doc);

        let err = doc
            .add_by_reference_relationship(RelationshipType::InferredFrom, root)
            .unwrap_err();
        assert_eq!(err, TreeError::ByReferenceNotAllowed(document_type));
        assert!(doc.edges().is_empty());
    }
}

#[test]
fn basic_text_rejects_numeric_items_in_strict_mode() {
    let config = DocumentConfig::strict().with_document_type(DocumentType::BasicText);
    let mut doc = document_with(config);
    let err = doc
        .add_content_item(RelationshipType::Contains, ValueType::Num, AddMode::BelowCurrent)
        .unwrap_err();
    let TreeError::IncompatibleRelationship(diagnostic) = err else {
        panic!("expected compatibility error");
    };
    assert_eq!(
        diagnostic.reason,
        IncompatibilityReason::DocumentTypeValue(DocumentType::BasicText)
    );
}

#[test]
fn check_consistency_reports_flagged_items_and_edges() {
    let mut doc = document_with(DocumentConfig::default());
    let root = doc.root().unwrap();
    let text = text_child(&mut doc);
    doc.set_value(ContentValue::text("finding")).unwrap();
    doc.add_content_item(RelationshipType::HasConceptMod, ValueType::Code, AddMode::BelowCurrent)
        .unwrap();
    doc.set_value(ContentValue::code(CodedEntry::new("T-04000", "SRT", "Breast")))
        .unwrap();
    assert!(doc.check_consistency().is_empty());

    doc.goto_node(text).unwrap();
    doc.add_by_reference_relationship(RelationshipType::SelectedFrom, root)
        .unwrap();
    doc.add_content_item(RelationshipType::Contains, ValueType::Text, AddMode::BelowCurrent)
        .unwrap();

    let found = doc.check_consistency();
    assert_eq!(found.len(), 2);
    assert!(!found[0].by_reference);
    assert!(found[1].by_reference);
    assert_eq!(found.len(), doc.diagnostics().len());
}
