use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use log::debug;

use crate::qan::{read_qan_file, QanFile, Unit};

use super::{ValidationCheck, ValidationReport};

/// Step 2: every QAN file parses and carries sensible concentrations
pub(crate) fn check_qan_data(files: &[PathBuf], report: &mut ValidationReport) -> Vec<QanFile> {
    let mut parsed = Vec::new();
    let mut unreadable = Vec::new();

    for path in files {
        match read_qan_file(path) {
            Ok(qan) => parsed.push(qan),
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                unreadable.push(format!("{} ({})", file_name(path), e));
            }
        }
    }

    if unreadable.is_empty() {
        report.add_check(ValidationCheck::ok("QAN files readable"));
    } else {
        report.add_check(ValidationCheck::failed(
            "QAN files readable",
            unreadable.join("; "),
        ));
    }

    check_skipped_lines(&parsed, report);
    check_concentrations_present(&parsed, report);
    check_duplicate_samples(&parsed, report);
    check_values(&parsed, report);
    check_element_coverage(&parsed, report);

    parsed
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn sample_name(qan: &QanFile) -> String {
    match &qan.path {
        Some(path) => format!("{} ({})", qan.sample_id, file_name(path)),
        None => qan.sample_id.clone(),
    }
}

fn check_skipped_lines(files: &[QanFile], report: &mut ValidationReport) {
    let with_skips: Vec<String> = files
        .iter()
        .filter(|qan| !qan.skipped.is_empty())
        .map(|qan| {
            let lines: Vec<String> = qan.skipped.iter().map(|s| s.line_number.to_string()).collect();
            format!("{} line(s) {}", sample_name(qan), lines.join(", "))
        })
        .collect();

    if with_skips.is_empty() {
        report.add_check(ValidationCheck::ok("Concentration lines well-formed"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Concentration lines well-formed",
            format!("Malformed lines skipped in {}", with_skips.join("; ")),
        ));
    }
}

fn check_concentrations_present(files: &[QanFile], report: &mut ValidationReport) {
    let empty: Vec<String> = files
        .iter()
        .filter(|qan| !qan.has_concentrations())
        .map(sample_name)
        .collect();

    if empty.is_empty() {
        report.add_check(ValidationCheck::ok("Concentration data present"));
    } else if empty.len() == files.len() {
        report.add_check(ValidationCheck::failed(
            "Concentration data present",
            "No file carries % or ppm concentrations",
        ));
    } else {
        report.add_check(ValidationCheck::warning(
            "Concentration data present",
            format!("No % or ppm concentrations in {}", empty.join(", ")),
        ));
    }
}

fn check_duplicate_samples(files: &[QanFile], report: &mut ValidationReport) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for qan in files {
        *counts.entry(qan.sample_id.as_str()).or_default() += 1;
    }
    let mut duplicates: Vec<&str> = counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();
    duplicates.sort_unstable();

    if duplicates.is_empty() {
        report.add_check(ValidationCheck::ok("Sample IDs unique"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Sample IDs unique",
            format!(
                "Measured more than once: {} (each file becomes its own column)",
                duplicates.join(", ")
            ),
        ));
    }
}

/// Negative concentrations are rejected by the parser, so they are read
/// back from the skipped lines
fn check_values(files: &[QanFile], report: &mut ValidationReport) {
    let mut negative = Vec::new();
    let mut above_total = Vec::new();

    for qan in files {
        for skipped in &qan.skipped {
            if let Some(value) = skipped.negative_concentration {
                negative.push(format!("{} line {} ({})", qan.sample_id, skipped.line_number, value));
            }
        }
        for m in &qan.measurements {
            if m.unit == Unit::Percent && m.concentration > 100.0 {
                above_total.push(format!("{} {} {}%", qan.sample_id, m.element, m.concentration));
            }
        }
    }

    if !negative.is_empty() {
        report.add_check(ValidationCheck::failed(
            "Concentration values valid",
            format!("Negative values: {}", negative.join(", ")),
        ));
    } else if !above_total.is_empty() {
        report.add_check(ValidationCheck::warning(
            "Concentration values valid",
            format!("Values above 100%: {}", above_total.join(", ")),
        ));
    } else {
        report.add_check(ValidationCheck::ok("Concentration values valid"));
    }
}

/// Elements reported for some samples but not for others
fn check_element_coverage(files: &[QanFile], report: &mut ValidationReport) {
    let sets: Vec<(&str, BTreeSet<&str>)> = files
        .iter()
        .filter(|qan| qan.has_concentrations())
        .map(|qan| {
            let elements = qan.concentrations().map(|m| m.element.as_str()).collect();
            (qan.sample_id.as_str(), elements)
        })
        .collect();
    let all: BTreeSet<&str> = sets.iter().flat_map(|(_, s)| s.iter().copied()).collect();

    let gaps: Vec<String> = sets
        .iter()
        .filter_map(|(id, elements)| {
            let missing: Vec<&str> = all.difference(elements).copied().collect();
            (!missing.is_empty()).then(|| format!("{} lacks {}", id, missing.join(" ")))
        })
        .collect();

    if gaps.is_empty() {
        report.add_check(ValidationCheck::ok("Element coverage consistent"));
    } else {
        report.add_check(ValidationCheck::warning(
            "Element coverage consistent",
            format!("Missing values will show as blanks: {}", gaps.join("; ")),
        ));
    }
}
