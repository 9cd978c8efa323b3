//! Hunt document parsing: front-matter extraction and LOCK section scan.
//!
//! The parser knows the document shape only. Schema rules (required fields,
//! status values, technique formats) live in [`crate::validate`]; this module
//! reports structural problems through [`ParseError`] so corpus-wide scans
//! can skip a corrupt file without giving up on the rest of the corpus.

use crate::schema::{HuntRecord, Section};
use anyhow::{Context, Result};
use regex::Regex;
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const DELIMITER: &str = "---";

/// Structural failures that make a document unreadable as a hunt record.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("missing frontmatter start delimiter")]
    MissingFrontMatterStart,
    #[error("missing frontmatter end delimiter")]
    MissingFrontMatterEnd,
    #[error("frontmatter is not a YAML mapping")]
    NotAMapping,
    #[error("invalid YAML in frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Split a document into its raw YAML block and the remaining body.
///
/// The document must open with a line consisting solely of `---` and carry a
/// matching closing line; the two failure modes are distinct error variants
/// so callers can report exactly which delimiter is absent.
fn split_front_matter(text: &str) -> Result<(String, String), ParseError> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim_end() == DELIMITER => {}
        _ => return Err(ParseError::MissingFrontMatterStart),
    }

    let mut yaml_lines = Vec::new();
    let mut rest = Vec::new();
    let mut closed = false;
    for line in lines {
        if !closed && line.trim_end() == DELIMITER {
            closed = true;
            continue;
        }
        if closed {
            rest.push(line);
        } else {
            yaml_lines.push(line);
        }
    }
    if !closed {
        return Err(ParseError::MissingFrontMatterEnd);
    }
    Ok((yaml_lines.join("\n"), rest.join("\n")))
}

/// Decode the front-matter mapping from a full document.
///
/// Unknown or extra keys are preserved as-is; rejecting them is the
/// validator's decision, not the parser's.
pub fn parse_front_matter(text: &str) -> Result<Mapping, ParseError> {
    let (yaml, _) = split_front_matter(text)?;
    decode_mapping(&yaml)
}

fn decode_mapping(yaml: &str) -> Result<Mapping, ParseError> {
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    match value {
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        serde_yaml::Value::Null => Ok(Mapping::new()),
        _ => Err(ParseError::NotAMapping),
    }
}

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^#{1,6}\s+(LEARN|OBSERVE|CHECK|KEEP)\b").expect("LOCK heading regex")
    })
}

/// Scan the full text for LOCK headings.
///
/// Matching is case-sensitive on the canonical names, with an optional `:`
/// and trailing description after the name. Presence only: a section seen
/// twice is still just `true`, a section never seen is `false`.
pub fn extract_sections(text: &str) -> BTreeMap<Section, bool> {
    let mut sections: BTreeMap<Section, bool> =
        Section::ALL.into_iter().map(|s| (s, false)).collect();
    for capture in heading_regex().captures_iter(text) {
        let found = match &capture[1] {
            "LEARN" => Section::Learn,
            "OBSERVE" => Section::Observe,
            "CHECK" => Section::Check,
            _ => Section::Keep,
        };
        sections.insert(found, true);
    }
    sections
}

/// Parse a full document into a record. Deterministic per byte content.
pub fn parse_document(text: &str, source_path: &Path) -> Result<HuntRecord, ParseError> {
    let front_matter = parse_front_matter(text)?;
    let (_, body) = split_front_matter(text)?;
    Ok(HuntRecord {
        front_matter,
        sections: extract_sections(text),
        source_path: source_path.to_path_buf(),
        body,
    })
}

/// Read and parse one hunt file.
pub fn parse_file(path: &Path) -> Result<HuntRecord> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read hunt file {}", path.display()))?;
    parse_document(&text, path).with_context(|| format!("parse hunt file {}", path.display()))
}
