//! Corpus directory owner: enumeration, id assignment, and aggregation.
//!
//! Every operation rescans the `hunts/` directory from scratch. There is no
//! index, no lock file, and no cached identifier state, so files added or
//! removed by external edits are always respected on the next call. Two
//! concurrent id assignments against the same directory can race; callers
//! in this single-user workspace model serialize hunt creation.
//!
//! Corrupt documents are skipped during aggregation so one bad file cannot
//! take down `list`, `stats`, `coverage`, or `search`. I/O failures are
//! different: they propagate immediately and fail the whole operation.

use crate::parser;
use crate::schema::{CorpusStats, CoverageMap, HuntRecord, HuntSummary, SearchHit, Status};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory under the workspace root holding the corpus.
pub const HUNTS_DIR: &str = "hunts";

pub struct HuntManager {
    hunts_dir: PathBuf,
}

/// Optional equality/membership filters for [`HuntManager::list_hunts`].
#[derive(Debug, Default, Clone)]
pub struct ListFilters {
    pub status: Option<Status>,
    pub tactic: Option<String>,
    pub technique: Option<String>,
    pub platform: Option<String>,
}

impl HuntManager {
    pub fn new(workspace: &Path) -> Self {
        HuntManager {
            hunts_dir: workspace.join(HUNTS_DIR),
        }
    }

    pub fn hunts_dir(&self) -> &Path {
        &self.hunts_dir
    }

    pub fn hunt_path(&self, hunt_id: &str) -> PathBuf {
        self.hunts_dir.join(format!("{hunt_id}.md"))
    }

    /// Derive the next hunt id from filenames.
    ///
    /// Filenames are authoritative here, not front matter: id assignment
    /// must not trust unvalidated document content. The numeric suffix is
    /// the maximum existing suffix plus one, so ids are never reused even
    /// after earlier records are deleted.
    pub fn next_hunt_id(&self, prefix: &str) -> Result<String> {
        let pattern = Regex::new(&format!(r"^{}-(\d+)", regex::escape(prefix)))
            .expect("hunt id filename regex");
        let mut max_suffix: u64 = 0;
        for entry in self.read_hunts_dir()? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(capture) = pattern.captures(name) {
                if let Ok(suffix) = capture[1].parse::<u64>() {
                    max_suffix = max_suffix.max(suffix);
                }
            }
        }
        Ok(format!("{}-{:04}", prefix, max_suffix + 1))
    }

    /// List parseable hunts, filtered, sorted by hunt id for stable output.
    pub fn list_hunts(&self, filters: &ListFilters) -> Result<Vec<HuntSummary>> {
        let mut summaries: Vec<HuntSummary> = self
            .load_records()?
            .iter()
            .filter(|record| filters.matches(record))
            .map(HuntRecord::summary)
            .collect();
        summaries.sort_by(|a, b| a.hunt_id.cmp(&b.hunt_id));
        Ok(summaries)
    }

    /// Fold corpus-wide statistics over all parseable hunts.
    pub fn calculate_stats(&self) -> Result<CorpusStats> {
        let records = self.load_records()?;
        let total = records.len();
        let mut completed = 0usize;
        let mut completed_with_tp = 0usize;
        let mut true_positives = 0i64;
        let mut false_positives = 0i64;

        for record in &records {
            let tp = record.int_field("true_positives");
            let fp = record.int_field("false_positives");
            true_positives += tp;
            false_positives += fp;
            if record.str_field("status") == Some(Status::Completed.as_str()) {
                completed += 1;
                if tp >= 1 {
                    completed_with_tp += 1;
                }
            }
        }

        let success_rate = if completed == 0 {
            0.0
        } else {
            round1(completed_with_tp as f64 / completed as f64 * 100.0)
        };
        let tp_fp_ratio = round2(true_positives as f64 / false_positives.max(1) as f64);

        Ok(CorpusStats {
            total,
            completed,
            total_findings: true_positives + false_positives,
            true_positives,
            false_positives,
            success_rate,
            tp_fp_ratio,
        })
    }

    /// Tactic to ordered-unique technique coverage.
    ///
    /// A record contributes the full cross product of its tactics and its
    /// techniques: the hunt covers all its techniques under every tactic it
    /// names, not a positional pairing.
    pub fn calculate_coverage(&self) -> Result<CoverageMap> {
        let mut coverage = CoverageMap::new();
        for record in self.load_records()? {
            let techniques = record.list_field("techniques");
            for tactic in record.list_field("tactics") {
                let entry = coverage.entry(tactic).or_default();
                for technique in &techniques {
                    if !entry.contains(technique) {
                        entry.push(technique.clone());
                    }
                }
            }
        }
        Ok(coverage)
    }

    /// Case-insensitive substring search over id, front matter, and body.
    ///
    /// No ranking: hits come back in enumeration order. An empty query
    /// matches nothing by definition.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        let mut hits = Vec::new();
        for record in self.load_records()? {
            let haystack = format!(
                "{} {} {}",
                record.hunt_id(),
                record.front_matter_text(),
                record.body
            )
            .to_lowercase();
            if haystack.contains(&needle) {
                hits.push(record.search_hit());
            }
        }
        Ok(hits)
    }

    /// Parse every `.md` document in the corpus, skipping malformed files.
    fn load_records(&self) -> Result<Vec<HuntRecord>> {
        let mut records = Vec::new();
        for entry in self.read_hunts_dir()? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let text = fs::read_to_string(&path)
                .with_context(|| format!("read hunt file {}", path.display()))?;
            match parser::parse_document(&text, &path) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::debug!(path = %path.display(), %err, "skipping malformed hunt file");
                }
            }
        }
        Ok(records)
    }

    fn read_hunts_dir(&self) -> Result<Vec<fs::DirEntry>> {
        let entries = fs::read_dir(&self.hunts_dir)
            .with_context(|| format!("read hunts directory {}", self.hunts_dir.display()))?;
        let mut collected = Vec::new();
        for entry in entries {
            collected.push(entry.with_context(|| {
                format!("enumerate hunts directory {}", self.hunts_dir.display())
            })?);
        }
        Ok(collected)
    }
}

impl ListFilters {
    fn matches(&self, record: &HuntRecord) -> bool {
        if let Some(status) = self.status {
            if record.str_field("status") != Some(status.as_str()) {
                return false;
            }
        }
        if let Some(tactic) = &self.tactic {
            if !record.list_field("tactics").iter().any(|t| t == tactic) {
                return false;
            }
        }
        if let Some(technique) = &self.technique {
            if !record.list_field("techniques").iter().any(|t| t == technique) {
                return false;
            }
        }
        if let Some(platform) = &self.platform {
            if !record.list_field("platforms").iter().any(|p| p == platform) {
                return false;
            }
        }
        true
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
