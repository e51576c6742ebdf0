use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use std::path::PathBuf;

use xrftab::metadata::{ProjectMetadata, METADATA_FILE_NAME};

/// Split `FIELD=VALUE`
pub(crate) fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    assignment
        .split_once('=')
        .map(|(field, value)| (field.trim(), value.trim()))
        .with_context(|| format!("Expected FIELD=VALUE, got '{}'", assignment))
}

/// Set one metadata field by name
fn set_field(metadata: &mut ProjectMetadata, field: &str, value: &str) -> Result<()> {
    let slot = match field {
        "date" => {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value))?;
            &mut metadata.date
        }
        "project_number" => &mut metadata.project_number,
        "project_name" => &mut metadata.project_name,
        "client_name" => &mut metadata.client_name,
        "operator" => &mut metadata.operator,
        "instrument" => &mut metadata.instrument,
        "sample_type" => &mut metadata.sample_type,
        other => anyhow::bail!("Unknown metadata field '{}'", other),
    };
    *slot = value.to_string();
    Ok(())
}

/// Show and optionally update `metadata.json`
pub fn run(folder: PathBuf, set: Vec<String>, save: bool) -> Result<()> {
    if !folder.is_dir() {
        anyhow::bail!("Folder does not exist: {}", folder.display());
    }

    let mut metadata = ProjectMetadata::load(&folder);
    for assignment in &set {
        let (field, value) = split_assignment(assignment)?;
        set_field(&mut metadata, field, value)?;
    }

    println!("Project Metadata");
    println!("================");
    for (field, value) in metadata.fields() {
        println!("  {:<16} {}", field, value);
    }

    let missing = metadata.missing_fields();
    if !missing.is_empty() {
        println!();
        println!("Missing: {}", missing.join(", "));
    }

    if save || !set.is_empty() {
        metadata
            .save(&folder)
            .with_context(|| format!("Failed to write {}", METADATA_FILE_NAME))?;
        info!("Saved {}", folder.join(METADATA_FILE_NAME).display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_field() {
        let mut metadata = ProjectMetadata::default();
        set_field(&mut metadata, "operator", "JD").unwrap();
        set_field(&mut metadata, "date", "2026-03-01").unwrap();
        assert_eq!(metadata.operator, "JD");
        assert_eq!(metadata.date, "2026-03-01");

        assert!(set_field(&mut metadata, "date", "01/03/2026").is_err());
        assert!(set_field(&mut metadata, "colour", "red").is_err());
    }

    #[test]
    fn test_split_assignment() {
        assert_eq!(split_assignment("operator = JD").unwrap(), ("operator", "JD"));
        assert!(split_assignment("operator").is_err());
    }
}
