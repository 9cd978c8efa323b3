//! Schema validation for parsed hunt records.
//!
//! Validation is pure: it inspects an in-memory [`HuntRecord`] and returns
//! human-readable error strings. Errors are data, never panics or early
//! returns, so a caller can show every problem in one pass. Ordering is
//! stable: missing required fields first, then format errors, then missing
//! LOCK sections.

use crate::schema::{HuntRecord, Status};
use regex::Regex;
use std::sync::OnceLock;

/// Front-matter keys every hunt record must carry.
pub const REQUIRED_FIELDS: &[&str] = &["hunt_id", "title", "status", "date", "hunter", "techniques"];

/// MITRE ATT&CK sub-technique id: `T####.###`.
///
/// Bare tactic-level codes like `T1003` are rejected; hunts are scoped to a
/// concrete sub-technique.
pub fn technique_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^T\d{4}\.\d{3}$").expect("technique id regex"))
}

pub fn is_valid_technique(id: &str) -> bool {
    technique_regex().is_match(id)
}

/// Apply the front-matter schema rules.
///
/// A `techniques` key that is present but empty is a valid empty set; the
/// missing-field rule is keyed on the mapping key alone, consistent with the
/// other list fields.
pub fn schema_errors(record: &HuntRecord) -> Vec<String> {
    let mut errors = Vec::new();

    for &field in REQUIRED_FIELDS {
        if !record.has_field(field) {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if record.has_field("status") {
        // The value must be a string scalar in the canonical set; a number,
        // boolean, or list is present but never a valid status.
        let valid = record.str_field("status").and_then(Status::parse).is_some();
        if !valid {
            let shown = record.field_text("status");
            errors.push(format!("Invalid status: {shown}"));
        }
    }

    for technique in record.list_field("techniques") {
        if !is_valid_technique(&technique) {
            errors.push(format!("Invalid technique format: {technique}"));
        }
    }

    errors
}

/// One error per absent LOCK section, in canonical order.
pub fn section_errors(record: &HuntRecord) -> Vec<String> {
    record
        .missing_sections()
        .into_iter()
        .map(|section| format!("Missing LOCK section: {section}"))
        .collect()
}

/// Full record validation: schema rules plus LOCK completeness.
pub fn validate_record(record: &HuntRecord) -> Vec<String> {
    let mut errors = schema_errors(record);
    errors.extend(section_errors(record));
    errors
}
