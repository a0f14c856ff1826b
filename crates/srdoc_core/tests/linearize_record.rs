use srdoc_core::{
    linearize, restore, AddMode, CodedEntry, ContentValue, Document, DocumentType,
    LinearizeError, NodeId, OrderedRecord, RelationshipType, RestoreError, ResolvedReference,
    ValueType,
};

fn add(doc: &mut Document, value_type: ValueType, mode: AddMode) -> NodeId {
    doc.add_content_item(RelationshipType::Contains, value_type, mode)
        .unwrap()
}

/// Root with a nested section, built out of order through `goto_node`.
fn nested_report() -> (Document, Vec<NodeId>) {
    let mut doc = Document::new(DocumentType::Comprehensive);
    let root = doc
        .add_content_item(RelationshipType::IsRoot, ValueType::Container, AddMode::default())
        .unwrap();
    let section = add(&mut doc, ValueType::Container, AddMode::BelowCurrent);
    let finding = add(&mut doc, ValueType::Text, AddMode::BelowCurrent);
    doc.goto_node(root).unwrap();
    let summary = add(&mut doc, ValueType::Text, AddMode::BelowCurrent);
    doc.goto_node(section).unwrap();
    let measurement = add(&mut doc, ValueType::Num, AddMode::BelowCurrent);
    doc.set_value(ContentValue::num(
        "12.5",
        CodedEntry::new("mm", "UCUM", "millimeter"),
    ))
    .unwrap();
    (doc, vec![root, section, finding, summary, measurement])
}

#[test]
fn positions_are_pre_order_and_unique() {
    let (doc, ids) = nested_report();
    let &[root, section, finding, summary, measurement] = ids.as_slice() else {
        panic!("expected five ids");
    };

    let record = linearize(&doc).unwrap();
    assert_eq!(record.len(), doc.len());

    let order: Vec<_> = record.entries.iter().map(|entry| entry.node_id).collect();
    assert_eq!(order, vec![root, section, finding, measurement, summary]);
    for (index, entry) in record.entries.iter().enumerate() {
        assert_eq!(entry.position, index + 1);
        if let Some(parent) = entry.parent_position {
            assert!(parent < entry.position);
        }
    }
    assert_eq!(record.position_of(root), Some(1));
    assert_eq!(record.entry(1).unwrap().parent_position, None);
    assert_eq!(record.entry(4).unwrap().location_string(), "1.1.2");
    assert_eq!(record.entry(5).unwrap().location, vec![1, 2]);
}

#[test]
fn linearize_is_deterministic_and_read_only() {
    let (doc, _) = nested_report();
    let before = doc.clone();

    let first = linearize(&doc).unwrap();
    let second = linearize(&doc).unwrap();
    assert_eq!(first, second);
    assert_eq!(doc.len(), before.len());
    assert_eq!(doc.current(), before.current());
}

#[test]
fn two_cycle_resolves_to_each_others_positions() {
    let mut doc = Document::new(DocumentType::Comprehensive);
    doc.add_content_item(RelationshipType::IsRoot, ValueType::Container, AddMode::default())
        .unwrap();
    let a = add(&mut doc, ValueType::Text, AddMode::BelowCurrent);
    let b = add(&mut doc, ValueType::Text, AddMode::AfterCurrent);
    doc.add_by_reference_relationship(RelationshipType::InferredFrom, a)
        .unwrap();
    doc.goto_node(a).unwrap();
    doc.add_by_reference_relationship(RelationshipType::InferredFrom, b)
        .unwrap();

    let record = linearize(&doc).unwrap();
    assert_eq!(record.len(), 3);

    let entry_a = record.entry(2).unwrap();
    let entry_b = record.entry(3).unwrap();
    assert_eq!(entry_a.node_id, a);
    assert_eq!(entry_a.references.len(), 1);
    assert_eq!(entry_a.references[0].target_position, 3);
    assert_eq!(entry_a.references[0].target_location, vec![1, 2]);
    assert_eq!(entry_b.references[0].target_position, 2);
    assert_eq!(
        entry_b.references[0].relationship,
        RelationshipType::InferredFrom
    );
}

#[test]
fn forward_references_resolve_to_later_positions() {
    let (mut doc, ids) = nested_report();
    let (root, summary) = (ids[0], ids[3]);
    let finding = ids[2];

    doc.goto_node(finding).unwrap();
    doc.add_by_reference_relationship(RelationshipType::InferredFrom, summary)
        .unwrap();
    doc.add_by_reference_relationship(RelationshipType::InferredFrom, root)
        .unwrap();

    let record = linearize(&doc).unwrap();
    let references = &record.entry(3).unwrap().references;
    assert_eq!(references[0].target_position, 5);
    assert_eq!(references[1].target_position, 1);
}

#[test]
fn empty_document_has_no_record() {
    let doc = Document::new(DocumentType::Enhanced);
    assert_eq!(linearize(&doc), Err(LinearizeError::EmptyDocument));
}

#[test]
fn record_survives_json_and_restore() {
    let (mut doc, ids) = nested_report();
    doc.metadata_mut().set_patient_name("Loop^Mr");
    doc.goto_node(ids[1]).unwrap();
    doc.set_template_identification("1500", "DCMR").unwrap();
    doc.goto_node(ids[4]).unwrap();
    doc.add_by_reference_relationship(RelationshipType::InferredFrom, ids[2])
        .unwrap();
    doc.goto_node(ids[2]).unwrap();
    doc.add_by_reference_relationship(RelationshipType::InferredFrom, ids[4])
        .unwrap();

    let record = linearize(&doc).unwrap();
    let json = record.to_json().unwrap();
    let parsed = OrderedRecord::from_json(&json).unwrap();
    assert_eq!(parsed, record);

    let restored = restore(&parsed).unwrap();
    assert_eq!(restored.len(), doc.len());
    assert_eq!(restored.edges().len(), doc.edges().len());
    assert_eq!(restored.metadata(), doc.metadata());

    let again = linearize(&restored).unwrap();
    assert_eq!(again.len(), record.len());
    for (left, right) in again.entries.iter().zip(&record.entries) {
        // Restored ids follow record positions; everything else matches.
        assert_eq!(left.node_id, left.position);
        assert_eq!(left.position, right.position);
        assert_eq!(left.parent_position, right.parent_position);
        assert_eq!(left.location, right.location);
        assert_eq!(left.relationship, right.relationship);
        assert_eq!(left.template, right.template);
        assert_eq!(left.value, right.value);
        assert_eq!(left.references, right.references);
    }
}

#[test]
fn restore_rejects_broken_records() {
    let (doc, _) = nested_report();
    let record = linearize(&doc).unwrap();

    let mut gap = record.clone();
    gap.entries[2].position = 9;
    assert_eq!(
        restore(&gap).unwrap_err(),
        RestoreError::NonContiguousPosition {
            expected: 3,
            found: 9,
        }
    );

    let mut backward = record.clone();
    backward.entries[1].parent_position = Some(4);
    assert_eq!(
        restore(&backward).unwrap_err(),
        RestoreError::InvalidParent {
            position: 2,
            parent: 4,
        }
    );

    let mut second_root = record.clone();
    second_root.entries[3].parent_position = None;
    assert_eq!(
        restore(&second_root).unwrap_err(),
        RestoreError::MisplacedRoot { position: 4 }
    );

    let mut child_first = record.clone();
    child_first.entries[0].relationship = RelationshipType::Contains;
    assert_eq!(
        restore(&child_first).unwrap_err(),
        RestoreError::MisplacedRoot { position: 1 }
    );

    let mut outside = record.clone();
    outside.entries[2].references.push(ResolvedReference {
        relationship: RelationshipType::InferredFrom,
        target_position: 99,
        target_location: vec![1, 9],
    });
    assert_eq!(
        restore(&outside).unwrap_err(),
        RestoreError::UnresolvedReference {
            position: 3,
            target: 99,
        }
    );

    let mut moved = record.clone();
    moved.entries[4].location = vec![1, 3];
    assert_eq!(
        restore(&moved).unwrap_err(),
        RestoreError::LocationMismatch { position: 5 }
    );

    let mut empty = record;
    empty.entries.clear();
    assert_eq!(restore(&empty).unwrap_err(), RestoreError::EmptyRecord);
}

#[test]
fn restore_rejects_records_out_of_pre_order() {
    let mut doc = Document::new(DocumentType::Comprehensive);
    let root = doc
        .add_content_item(RelationshipType::IsRoot, ValueType::Container, AddMode::default())
        .unwrap();
    let section = add(&mut doc, ValueType::Container, AddMode::BelowCurrent);
    add(&mut doc, ValueType::Text, AddMode::BelowCurrent);
    doc.goto_node(section).unwrap();
    add(&mut doc, ValueType::Text, AddMode::AfterCurrent);

    let record = linearize(&doc).unwrap();
    let parents: Vec<_> = record
        .entries
        .iter()
        .map(|entry| entry.parent_position)
        .collect();
    assert_eq!(parents, vec![None, Some(1), Some(2), Some(1)]);
    assert_eq!(record.position_of(root), Some(1));

    // Swap the nested item behind its parent's sibling and renumber.
    let mut swapped = record.clone();
    swapped.entries.swap(2, 3);
    swapped.entries[2].position = 3;
    swapped.entries[3].position = 4;
    assert_eq!(
        restore(&swapped).unwrap_err(),
        RestoreError::InvalidParent {
            position: 4,
            parent: 2,
        }
    );

    let restored = restore(&record).unwrap();
    assert_eq!(linearize(&restored).unwrap().len(), record.len());
}
