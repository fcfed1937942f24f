// src/chat/context.rs
// Renders retrieved knowledge records into the prompt's context block

use crate::knowledge::KnowledgeRecord;

/// Placeholder for absent record fields
pub const MISSING_FIELD: &str = "N/A";

/// Context used when retrieval yields nothing (or failed)
pub const NO_CONTEXT: &str = "No specific portfolio information found for this query.";

const BLOCK_SEPARATOR: &str = "---";

fn field(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => MISSING_FIELD,
    }
}

/// One fixed-field block. Total: never fails, whatever is missing.
pub fn format_record(record: &KnowledgeRecord) -> String {
    let mut block = format!(
        "Project: {}\nType: {}\nTitle: {}\nContent: {}\n",
        field(&record.project),
        field(&record.kind),
        field(&record.title),
        field(&record.content),
    );

    if let Some(tags) = record.tags.as_deref().filter(|t| !t.is_empty()) {
        block.push_str("Tags: ");
        block.push_str(tags);
        block.push('\n');
    }

    block.push_str(BLOCK_SEPARATOR);
    block
}

/// Join all record blocks, or fall back to [`NO_CONTEXT`]
pub fn format_context(records: &[KnowledgeRecord]) -> String {
    if records.is_empty() {
        return NO_CONTEXT.to_string();
    }

    records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join("\n\n")
}
