//! CLI demo entry point.
//!
//! # Responsibility
//! - Build a small report whose by-reference edges form a cycle.
//! - Print its ordered record as JSON so the linearization can be inspected.
//!
//! Settings come from `SRDOC_*` environment variables; file logging starts
//! only when `SRDOC_LOG_DIR` names an absolute directory.

use log::info;
use srdoc_core::{
    init_logging_with_config, linearize, AddMode, CodedEntry, Document, DocumentConfig,
    RelationshipType, TreeResult, ValueType, PRIVATE_CODING_SCHEME_DESIGNATOR,
};
use std::process::ExitCode;

const ENV_LOG_DIR: &str = "SRDOC_LOG_DIR";

fn main() -> ExitCode {
    let config = match DocumentConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("srdoc: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Ok(log_dir) = std::env::var(ENV_LOG_DIR) {
        if let Err(err) = init_logging_with_config(&config, &log_dir) {
            eprintln!("srdoc: logging disabled: {err}");
        }
    }

    let document = match build_cycle_report(config) {
        Ok(document) => document,
        Err(err) => {
            eprintln!("srdoc: failed to build report ({}): {err}", err.category());
            return ExitCode::FAILURE;
        }
    };

    let record = match linearize(&document) {
        Ok(record) => record,
        Err(err) => {
            eprintln!("srdoc: failed to linearize report: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_linearize module=cli status=ok items={} diagnostics={}",
        record.len(),
        document.diagnostics().len()
    );

    match record.to_json() {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("srdoc: failed to serialize record: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Root container with two paragraphs that infer from each other.
fn build_cycle_report(config: DocumentConfig) -> TreeResult<Document> {
    let mut document = Document::with_config(config);
    {
        let metadata = document.metadata_mut();
        metadata.set_study_description("srdoc structured reporting demo");
        metadata.set_series_description("Valid report with loop/cycle");
        metadata.set_patient_name("Loop^Mr");
        metadata.set_patient_sex("M");
        metadata.add_private_coding_scheme();
    }

    document.add_content_item(
        RelationshipType::IsRoot,
        ValueType::Container,
        AddMode::default(),
    )?;
    document.set_concept_name(private_code("TST.01", "Document Title"))?;

    let first = document.add_content_item(
        RelationshipType::Contains,
        ValueType::Text,
        AddMode::BelowCurrent,
    )?;
    document.set_concept_name(private_code("TST.02", "First Paragraph"))?;
    document.set_string_value("Some text.")?;

    let second = document.add_content_item(
        RelationshipType::Contains,
        ValueType::Text,
        AddMode::AfterCurrent,
    )?;
    document.set_concept_name(private_code("TST.03", "Second Paragraph"))?;
    document.set_string_value("Some more text.")?;

    document.add_by_reference_relationship(RelationshipType::InferredFrom, first)?;
    document.goto_node(first)?;
    document.add_by_reference_relationship(RelationshipType::InferredFrom, second)?;
    document.goto_root()?;
    Ok(document)
}

fn private_code(value: &str, meaning: &str) -> CodedEntry {
    CodedEntry::new(value, PRIVATE_CODING_SCHEME_DESIGNATOR, meaning)
}
