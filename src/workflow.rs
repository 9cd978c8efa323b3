//! Command implementations gluing config, manager, and renderer together.

use crate::cli::{CoverageArgs, ListArgs, NewArgs, SearchArgs, StatsArgs, ValidateArgs};
use crate::config;
use crate::manager::{HuntManager, ListFilters};
use crate::output;
use crate::parser;
use crate::schema::Status;
use crate::template::{render_hunt, HuntFields};
use crate::validate;
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn run_new(workspace: &Path, args: NewArgs) -> Result<()> {
    for technique in &args.techniques {
        if !validate::is_valid_technique(technique) {
            bail!("Invalid technique format: {technique} (expected T####.###)");
        }
    }

    let config = config::load(workspace)?;
    let manager = HuntManager::new(workspace);
    fs::create_dir_all(manager.hunts_dir()).with_context(|| {
        format!("create hunts directory {}", manager.hunts_dir().display())
    })?;

    let hunt_id = manager.next_hunt_id(&config.hunt_prefix)?;
    let hunter = args
        .hunter
        .or(config.hunter)
        .unwrap_or_else(|| "unassigned".to_string());
    let fields = HuntFields {
        hunt_id: hunt_id.clone(),
        title: args.title,
        date: chrono::Local::now().format("%Y-%m-%d").to_string(),
        hunter,
        techniques: args.techniques,
        tactics: args.tactics,
        platforms: args.platforms,
        data_sources: args.data_sources,
    };

    let path = manager.hunt_path(&hunt_id);
    if path.exists() {
        bail!("hunt file already exists at {}", path.display());
    }
    fs::write(&path, render_hunt(&fields))
        .with_context(|| format!("write hunt file {}", path.display()))?;

    println!("Created {}: {}", hunt_id, fields.title);
    println!("  file: {}", path.display());
    Ok(())
}

pub fn run_list(workspace: &Path, args: ListArgs) -> Result<()> {
    let status = match args.status.as_deref() {
        Some(value) => Some(
            Status::parse(value)
                .ok_or_else(|| anyhow!("unknown status filter: {value}"))?,
        ),
        None => None,
    };
    let filters = ListFilters {
        status,
        tactic: args.tactic,
        technique: args.technique,
        platform: args.platform,
    };
    let hunts = HuntManager::new(workspace).list_hunts(&filters)?;
    if args.json {
        output::emit_json(&hunts)
    } else {
        output::print_summaries(&hunts);
        Ok(())
    }
}

pub fn run_validate(workspace: &Path, args: ValidateArgs) -> Result<()> {
    let manager = HuntManager::new(workspace);
    match args.hunt_id {
        Some(hunt_id) => validate_one(&manager, &hunt_id),
        None => validate_all(&manager),
    }
}

fn validate_one(manager: &HuntManager, hunt_id: &str) -> Result<()> {
    let path = manager.hunt_path(hunt_id);
    if !path.is_file() {
        bail!("hunt not found: {hunt_id}");
    }
    let record = parser::parse_file(&path)?;
    let errors = validate::validate_record(&record);
    output::print_validation(hunt_id, &errors);
    if !errors.is_empty() {
        bail!("{} has {} validation error(s)", hunt_id, errors.len());
    }
    Ok(())
}

fn validate_all(manager: &HuntManager) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(manager.hunts_dir())
        .with_context(|| format!("read hunts directory {}", manager.hunts_dir().display()))?
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("enumerate hunts directory {}", manager.hunts_dir().display()))?;
    entries.sort_by_key(|entry| entry.file_name());

    let mut valid = 0usize;
    let mut invalid = 0usize;
    for entry in entries {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        // Only structural parse failures become per-file findings; an
        // unreadable file is an I/O error and fails the whole run.
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read hunt file {}", path.display()))?;
        let errors = match parser::parse_document(&text, &path) {
            Ok(record) => validate::validate_record(&record),
            Err(err) => vec![err.to_string()],
        };
        output::print_validation(&name, &errors);
        if errors.is_empty() {
            valid += 1;
        } else {
            invalid += 1;
        }
    }
    println!("\nResults: {valid} valid, {invalid} invalid");
    Ok(())
}

pub fn run_stats(workspace: &Path, args: StatsArgs) -> Result<()> {
    let stats = HuntManager::new(workspace).calculate_stats()?;
    if args.json {
        output::emit_json(&stats)
    } else {
        output::print_stats(&stats);
        Ok(())
    }
}

pub fn run_coverage(workspace: &Path, args: CoverageArgs) -> Result<()> {
    let coverage = HuntManager::new(workspace).calculate_coverage()?;
    if args.json {
        output::emit_json(&coverage)
    } else {
        output::print_coverage(&coverage);
        Ok(())
    }
}

#[derive(Serialize)]
struct SearchResults<'a> {
    query: &'a str,
    hits: Vec<crate::schema::SearchHit>,
}

pub fn run_search(workspace: &Path, args: SearchArgs) -> Result<()> {
    let hits = HuntManager::new(workspace).search(&args.query)?;
    if args.json {
        output::emit_json(&SearchResults {
            query: &args.query,
            hits,
        })
    } else {
        output::print_hits(&args.query, &hits);
        Ok(())
    }
}
