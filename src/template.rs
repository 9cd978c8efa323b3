//! New-hunt document rendering.
//!
//! Builds the full Markdown body for a fresh record: front matter carrying
//! every schema field plus the four LOCK section skeletons. The output must
//! round-trip through the parser with all sections present, so heading names
//! and delimiters here are the canonical ones the parser scans for.

use crate::schema::{Section, Status};

/// Field values for a new hunt record.
#[derive(Debug, Clone)]
pub struct HuntFields {
    pub hunt_id: String,
    pub title: String,
    pub date: String,
    pub hunter: String,
    pub techniques: Vec<String>,
    pub tactics: Vec<String>,
    pub platforms: Vec<String>,
    pub data_sources: Vec<String>,
}

fn section_prompt(section: Section) -> (&'static str, &'static str) {
    match section {
        Section::Learn => (
            "Prepare the Hunt",
            "State the hypothesis, the threat intel behind it, and the scope.",
        ),
        Section::Observe => (
            "Expected Behaviors",
            "Describe what the activity should look like in the data sources above.",
        ),
        Section::Check => (
            "Execute & Analyze",
            "Record the queries run and what the results showed.",
        ),
        Section::Keep => (
            "Findings & Response",
            "Capture findings, true/false positive counts, and lessons learned.",
        ),
    }
}

/// Render a complete new hunt document.
pub fn render_hunt(fields: &HuntFields) -> String {
    let mut doc = String::new();
    doc.push_str("---\n");
    doc.push_str(&format!("hunt_id: {}\n", yaml_scalar(&fields.hunt_id)));
    doc.push_str(&format!("title: {}\n", yaml_scalar(&fields.title)));
    doc.push_str(&format!("status: {}\n", Status::Planning));
    doc.push_str(&format!("date: {}\n", yaml_scalar(&fields.date)));
    doc.push_str(&format!("hunter: {}\n", yaml_scalar(&fields.hunter)));
    doc.push_str(&format!("techniques: {}\n", yaml_list(&fields.techniques)));
    doc.push_str(&format!("tactics: {}\n", yaml_list(&fields.tactics)));
    doc.push_str(&format!("platforms: {}\n", yaml_list(&fields.platforms)));
    doc.push_str(&format!("data_sources: {}\n", yaml_list(&fields.data_sources)));
    doc.push_str("tags: []\n");
    doc.push_str("true_positives: 0\n");
    doc.push_str("false_positives: 0\n");
    doc.push_str("---\n\n");

    doc.push_str(&format!("# {}: {}\n", fields.hunt_id, fields.title));
    for section in Section::ALL {
        let (label, prompt) = section_prompt(section);
        doc.push_str(&format!("\n## {}: {}\n\n_{}_\n", section.name(), label, prompt));
    }
    doc
}

/// Quote a scalar when plain YAML would misread it.
fn yaml_scalar(value: &str) -> String {
    let needs_quoting = value.is_empty()
        || value.starts_with(|c: char| c.is_whitespace() || "-?&*!|>%@`'\"#".contains(c))
        || value.ends_with(char::is_whitespace)
        || value.contains(": ")
        || value.ends_with(':')
        || value.contains(|c: char| "{}[],#".contains(c));
    if needs_quoting {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn yaml_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| yaml_scalar(v)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;
    use crate::validate;
    use std::path::Path;

    fn fields() -> HuntFields {
        HuntFields {
            hunt_id: "H-0001".to_string(),
            title: "LSASS Dumping Detection".to_string(),
            date: "2025-12-02".to_string(),
            hunter: "Test Hunter".to_string(),
            techniques: vec!["T1003.001".to_string()],
            tactics: vec!["credential-access".to_string()],
            platforms: vec!["windows".to_string()],
            data_sources: vec!["windows-event-logs".to_string()],
        }
    }

    #[test]
    fn rendered_hunt_round_trips_through_parser() {
        let doc = render_hunt(&fields());
        let record = parser::parse_document(&doc, Path::new("hunts/H-0001.md"))
            .expect("rendered document parses");

        assert_eq!(record.str_field("hunt_id"), Some("H-0001"));
        assert_eq!(record.str_field("title"), Some("LSASS Dumping Detection"));
        assert_eq!(record.str_field("status"), Some("planning"));
        assert_eq!(record.str_field("date"), Some("2025-12-02"));
        assert_eq!(record.str_field("hunter"), Some("Test Hunter"));
        assert_eq!(record.list_field("techniques"), vec!["T1003.001"]);
        assert_eq!(record.list_field("tactics"), vec!["credential-access"]);
        assert_eq!(record.list_field("platforms"), vec!["windows"]);
        assert_eq!(record.list_field("data_sources"), vec!["windows-event-logs"]);
        assert_eq!(record.int_field("true_positives"), 0);
        assert!(record.missing_sections().is_empty());
    }

    #[test]
    fn rendered_hunt_is_schema_valid() {
        let doc = render_hunt(&fields());
        let record =
            parser::parse_document(&doc, Path::new("hunts/H-0001.md")).expect("parses");
        let errors = validate::validate_record(&record);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn awkward_titles_survive_the_round_trip() {
        for title in [
            "Kerberoasting: SPN sweep",
            "\"quoted\" title",
            "#1 priority hunt",
            "trailing colon:",
        ] {
            let mut f = fields();
            f.title = title.to_string();
            let doc = render_hunt(&f);
            let record =
                parser::parse_document(&doc, Path::new("hunts/H-0001.md")).expect("parses");
            assert_eq!(record.str_field("title"), Some(title), "title: {title}");
        }
    }

    #[test]
    fn empty_lists_render_as_empty_sets() {
        let mut f = fields();
        f.tactics.clear();
        let doc = render_hunt(&f);
        let record = parser::parse_document(&doc, Path::new("hunts/H-0001.md")).expect("parses");
        assert!(record.list_field("tactics").is_empty());
    }
}
