use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;

use xrftab::metadata::{LookupTable, LOOKUP_FILE_NAME};
use xrftab::qan::{find_qan_files, read_qan_file};

use super::metadata::split_assignment;

/// Apply `SAMPLE:FIELD=VALUE`
fn apply_assignment(lookup: &mut LookupTable, assignment: &str) -> Result<()> {
    let (target, value) = split_assignment(assignment)?;
    let (sample_id, field) = target
        .rsplit_once(':')
        .with_context(|| format!("Expected SAMPLE:FIELD=VALUE, got '{}'", assignment))?;

    lookup.set(sample_id.trim(), field.trim(), value)?;
    Ok(())
}

/// Show and optionally update `sample_lookup.csv`
pub fn run(folder: PathBuf, set: Vec<String>, save: bool) -> Result<()> {
    let existing = LookupTable::load(&folder)
        .with_context(|| format!("Failed to read {}", LOOKUP_FILE_NAME))?;

    let mut sample_ids = Vec::new();
    for path in find_qan_files(&folder)? {
        match read_qan_file(&path) {
            Ok(qan) => sample_ids.push(qan.sample_id),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    let orphans: Vec<&str> = existing
        .entries()
        .iter()
        .map(|e| e.sample_id.as_str())
        .filter(|id| !sample_ids.iter().any(|s| s.as_str() == *id))
        .collect();
    if !orphans.is_empty() {
        warn!("Rows without a QAN file are dropped: {}", orphans.join(", "));
    }

    let mut lookup = existing.merge(&sample_ids);
    for assignment in &set {
        apply_assignment(&mut lookup, assignment)?;
    }

    println!("Sample Lookup Table");
    println!("===================");
    println!(
        "{:<16} {:<14} {:<14} {}",
        "Sample ID", "Notebook ID", "Client ID", "Report Abbreviation"
    );
    for entry in lookup.entries() {
        println!(
            "{:<16} {:<14} {:<14} {}",
            entry.sample_id, entry.notebook_id, entry.client_id, entry.report_abbreviation
        );
    }

    let duplicates = lookup.duplicate_abbreviations();
    if !duplicates.is_empty() {
        warn!("Report abbreviations used more than once: {}", duplicates.join(", "));
    }

    if save || !set.is_empty() {
        lookup
            .save(&folder)
            .with_context(|| format!("Failed to write {}", LOOKUP_FILE_NAME))?;
        info!("Saved {} row(s) to {}", lookup.len(), folder.join(LOOKUP_FILE_NAME).display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_assignment() {
        let mut lookup = LookupTable::from_sample_ids(["BAS-01"]);
        apply_assignment(&mut lookup, "BAS-01:report_abbreviation=B1").unwrap();
        assert_eq!(lookup.get("BAS-01").report_abbreviation, "B1");

        assert!(apply_assignment(&mut lookup, "GRA-02:client_id=X").is_err());
        assert!(apply_assignment(&mut lookup, "BAS-01:colour=red").is_err());
        assert!(apply_assignment(&mut lookup, "BAS-01=B1").is_err());
    }
}
