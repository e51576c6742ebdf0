use std::collections::HashSet;
use std::path::Path;

use crate::metadata::{
    LookupTable, MetadataError, ProjectMetadata, Settings, LOOKUP_FILE_NAME, METADATA_FILE_NAME,
};
use crate::qan::QanFile;

use super::{ValidationCheck, ValidationReport};

/// Step 3: `metadata.json` is complete and names a known instrument
pub(crate) fn check_project_metadata(
    folder: &Path,
    settings: &Settings,
    report: &mut ValidationReport,
) {
    let path = folder.join(METADATA_FILE_NAME);
    if !path.exists() {
        report.add_check(ValidationCheck::warning(
            "Project metadata",
            format!("No {}; values will be taken from the folder path", METADATA_FILE_NAME),
        ));
        return;
    }

    let metadata = match ProjectMetadata::from_file(&path) {
        Ok(metadata) => metadata,
        Err(e) => {
            report.add_check(ValidationCheck::failed(
                "Project metadata",
                format!("Cannot parse {}: {}", METADATA_FILE_NAME, e),
            ));
            return;
        }
    };

    let missing = metadata.missing_fields();
    if missing.is_empty() {
        report.add_check(ValidationCheck::ok("Project metadata"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Project metadata",
            format!("Empty fields: {}", missing.join(", ")),
        ));
    }

    let instrument = metadata.instrument.trim();
    if settings.knows_instrument(instrument) {
        report.add_check(ValidationCheck::ok("Instrument known"));
    } else if !instrument.is_empty() {
        report.add_check(ValidationCheck::warning(
            "Instrument known",
            format!("'{}' is not in the settings; no tube elements will be ignored", instrument),
        ));
    }

    if !metadata.sample_type.trim().is_empty() && !metadata.supports_absolute() {
        report.add_check(ValidationCheck::warning(
            "Sample type",
            format!(
                "'{}' supports relative tables only",
                metadata.sample_type.trim()
            ),
        ));
    }
}

/// Step 4: the lookup table is consistent with the measured samples
pub(crate) fn check_lookup(folder: &Path, samples: &[QanFile], report: &mut ValidationReport) {
    if !folder.join(LOOKUP_FILE_NAME).exists() {
        report.add_check(ValidationCheck::warning(
            "Lookup table",
            format!("No {}; sample IDs will be used as column labels", LOOKUP_FILE_NAME),
        ));
        return;
    }

    let lookup = match LookupTable::load(folder) {
        Ok(lookup) => lookup,
        Err(MetadataError::DuplicateSample(id)) => {
            report.add_check(ValidationCheck::failed(
                "Lookup sample IDs unique",
                format!("'{}' appears more than once", id),
            ));
            return;
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed(
                "Lookup table",
                format!("Cannot read {}: {}", LOOKUP_FILE_NAME, e),
            ));
            return;
        }
    };
    report.add_check(ValidationCheck::ok("Lookup sample IDs unique"));

    let measured: HashSet<&str> = samples.iter().map(|s| s.sample_id.as_str()).collect();
    let orphans: Vec<&str> = lookup
        .entries()
        .iter()
        .map(|e| e.sample_id.as_str())
        .filter(|id| !measured.contains(id))
        .collect();
    if orphans.is_empty() {
        report.add_check(ValidationCheck::ok("Lookup rows match samples"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Lookup rows match samples",
            format!("No QAN file for: {}", orphans.join(", ")),
        ));
    }

    let unlisted: Vec<&str> = samples
        .iter()
        .map(|s| s.sample_id.as_str())
        .filter(|id| !lookup.contains(id))
        .collect();
    if !unlisted.is_empty() {
        report.add_check(ValidationCheck::warning(
            "Samples listed in lookup",
            format!("Not in {}: {}", LOOKUP_FILE_NAME, unlisted.join(", ")),
        ));
    }

    let duplicates = lookup.duplicate_abbreviations();
    if duplicates.is_empty() {
        report.add_check(ValidationCheck::ok("Report abbreviations unique"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Report abbreviations unique",
            format!("Shared by several samples: {}", duplicates.join(", ")),
        ));
    }
}
