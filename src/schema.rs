//! Data model for hunt records and the derived corpus views.
//!
//! A hunt record is one Markdown document: YAML front matter plus the four
//! LOCK narrative sections. The core only reads records; `status` and every
//! other field are user-authored data, validated but never transitioned here.

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// The four canonical LOCK sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Learn,
    Observe,
    Check,
    Keep,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Learn, Section::Observe, Section::Check, Section::Keep];

    /// Canonical heading name as it appears in documents.
    pub fn name(self) -> &'static str {
        match self {
            Section::Learn => "LEARN",
            Section::Observe => "OBSERVE",
            Section::Check => "CHECK",
            Section::Keep => "KEEP",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hunt lifecycle states. Single source of truth for the valid `status`
/// values; both the validator and the list filter consume this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Planning,
    Active,
    InProgress,
    Completed,
    Paused,
    Archived,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Planning,
        Status::Active,
        Status::InProgress,
        Status::Completed,
        Status::Paused,
        Status::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Planning => "planning",
            Status::Active => "active",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
            Status::Paused => "paused",
            Status::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Status> {
        Status::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed hunt document.
///
/// `sections` always carries exactly the four canonical keys; a section with
/// no matching heading is `false`, never an absent key. `body` is the raw
/// text after the front matter block, retained for full-text search.
#[derive(Debug, Clone)]
pub struct HuntRecord {
    pub front_matter: Mapping,
    pub sections: BTreeMap<Section, bool>,
    pub source_path: PathBuf,
    pub body: String,
}

impl HuntRecord {
    pub fn has_field(&self, key: &str) -> bool {
        self.front_matter.contains_key(Value::from(key))
    }

    /// Scalar field rendered as a string slice, if present and scalar.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.front_matter.get(Value::from(key)).and_then(Value::as_str)
    }

    /// List field as owned strings. A bare scalar is promoted to a
    /// single-element list so `techniques: T1003.001` still filters.
    pub fn list_field(&self, key: &str) -> Vec<String> {
        match self.front_matter.get(Value::from(key)) {
            Some(Value::Sequence(items)) => items.iter().map(scalar_text).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![scalar_text(other)],
        }
    }

    /// Any field rendered as plain text, regardless of its YAML type.
    pub fn field_text(&self, key: &str) -> String {
        self.front_matter
            .get(Value::from(key))
            .map(value_text)
            .unwrap_or_default()
    }

    /// Integer field, defaulting to 0 when absent or non-numeric.
    pub fn int_field(&self, key: &str) -> i64 {
        self.front_matter
            .get(Value::from(key))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    pub fn hunt_id(&self) -> String {
        self.str_field("hunt_id").unwrap_or_default().to_string()
    }

    /// LOCK sections whose heading was not found, in canonical order.
    pub fn missing_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|section| !self.sections.get(section).copied().unwrap_or(false))
            .collect()
    }

    pub fn summary(&self) -> HuntSummary {
        HuntSummary {
            hunt_id: self.hunt_id(),
            title: self.str_field("title").unwrap_or_default().to_string(),
            status: self.str_field("status").unwrap_or_default().to_string(),
            techniques: self.list_field("techniques"),
            true_positives: self.int_field("true_positives"),
            false_positives: self.int_field("false_positives"),
        }
    }

    pub fn search_hit(&self) -> SearchHit {
        SearchHit {
            hunt_id: self.hunt_id(),
            title: self.str_field("title").unwrap_or_default().to_string(),
            status: self.str_field("status").unwrap_or_default().to_string(),
            path: self.source_path.display().to_string(),
        }
    }

    /// All front-matter values rendered as plain text, for search matching.
    pub fn front_matter_text(&self) -> String {
        self.front_matter
            .values()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Sequence(items) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
        Value::Mapping(map) => map.values().map(value_text).collect::<Vec<_>>().join(" "),
        other => scalar_text(other),
    }
}

/// Listing view for one record.
#[derive(Debug, Clone, Serialize)]
pub struct HuntSummary {
    pub hunt_id: String,
    pub title: String,
    pub status: String,
    pub techniques: Vec<String>,
    pub true_positives: i64,
    pub false_positives: i64,
}

/// Full-text search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub hunt_id: String,
    pub title: String,
    pub status: String,
    pub path: String,
}

/// Corpus-wide statistics. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub total: usize,
    pub completed: usize,
    pub total_findings: i64,
    pub true_positives: i64,
    pub false_positives: i64,
    pub success_rate: f64,
    pub tp_fp_ratio: f64,
}

/// Tactic name to ordered-unique technique ids observed under it.
pub type CoverageMap = BTreeMap<String, Vec<String>>;
