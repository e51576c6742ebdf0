use super::*;
use crate::metadata::{InstrumentProfile, LookupEntry, LookupTable, ProjectMetadata};
use std::fs;
use tempfile::tempdir;

fn status<'a>(report: &'a ValidationReport, name: &str) -> &'a CheckStatus {
    &report
        .checks
        .iter()
        .find(|c| c.name.starts_with(name))
        .unwrap_or_else(|| panic!("no check named {}", name))
        .status
}

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.instruments.insert(
        "Zetium".to_string(),
        InstrumentProfile {
            tube_elements: vec!["Rh".to_string()],
        },
    );
    settings
}

fn write_qan(dir: &Path, file: &str, body: &str) {
    fs::write(dir.join(file), body).unwrap();
}

fn good_folder(dir: &Path) {
    write_qan(
        dir,
        "BAS-01.qan",
        "S BAS-01\nC Si1 23.0 % Si\nC Al1 8.0 % Al\nC Sr1 450 ppm Sr\n",
    );
    write_qan(
        dir,
        "GRA-02.qan",
        "S GRA-02\nC Si1 33.0 % Si\nC Al1 7.0 % Al\nC Sr1 120 ppm Sr\n",
    );
    ProjectMetadata {
        date: "2026-01-15".to_string(),
        project_number: "42".to_string(),
        project_name: "Ridge".to_string(),
        client_name: "Acme".to_string(),
        operator: "JD".to_string(),
        instrument: "Zetium".to_string(),
        sample_type: "standard pellet".to_string(),
    }
    .save(dir)
    .unwrap();
    LookupTable::from_sample_ids(["BAS-01", "GRA-02"]).save(dir).unwrap();
}

#[test]
fn test_validation_report_display() {
    let mut report = ValidationReport::new("Data/XRF");
    report.add_check(ValidationCheck::ok("Test check 1"));
    report.add_check(ValidationCheck::warning("Test check 2", "This is a warning"));
    report.add_check(ValidationCheck::failed("Test check 3", "This failed"));

    let output = format!("{}", report);
    assert!(output.starts_with("XRF Validation Report"));
    assert!(output.contains("✓"));
    assert!(output.contains("⚠"));
    assert!(output.contains("✗"));
    assert!(output.contains("1 passed, 1 warnings, 1 failed"));
    assert!(output.contains("Validation FAILED"));
    assert!(report.format_colored().contains("This is a warning"));
}

#[test]
fn test_clean_folder_passes() {
    let dir = tempdir().unwrap();
    good_folder(dir.path());

    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
    assert!(report.to_string().contains("Validation PASSED"));
}

#[test]
fn test_missing_folder_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = validate_folder(&missing, &settings()).unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_empty_folder_fails() {
    let dir = tempdir().unwrap();
    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(status(&report, "QAN files present"), CheckStatus::Failed(_)));
    assert!(matches!(status(&report, "Project metadata"), CheckStatus::Warning(_)));
    assert!(matches!(status(&report, "Lookup table"), CheckStatus::Warning(_)));
}

#[test]
fn test_data_problems() {
    let dir = tempdir().unwrap();
    good_folder(dir.path());
    write_qan(dir.path(), "BAS-01b.qan", "S BAS-01\nC Si1 n.d. % Si\nC Al1 8.1 % Al\n");
    write_qan(dir.path(), "EMPTY.qan", "S EMPTY\nC Cl1 12.3 kcps Cl\n");

    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(
        status(&report, "Concentration lines well-formed"),
        CheckStatus::Warning(msg) if msg.contains("line(s) 2")
    ));
    assert!(matches!(
        status(&report, "Concentration data present"),
        CheckStatus::Warning(msg) if msg.contains("EMPTY")
    ));
    assert!(matches!(
        status(&report, "Sample IDs unique"),
        CheckStatus::Warning(msg) if msg.contains("BAS-01")
    ));
    assert!(matches!(
        status(&report, "Element coverage consistent"),
        CheckStatus::Warning(msg) if msg.contains("lacks Si Sr")
    ));
    assert!(matches!(
        status(&report, "Samples listed in lookup"),
        CheckStatus::Warning(msg) if msg.contains("EMPTY")
    ));
    assert!(!report.has_failures(), "{}", report);
}

#[test]
fn test_values_above_100_percent() {
    let dir = tempdir().unwrap();
    write_qan(dir.path(), "X.qan", "S X\nC Fe1 120.0 % Fe\n");
    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(
        status(&report, "Concentration values valid"),
        CheckStatus::Warning(msg) if msg.contains("Fe")
    ));
}

#[test]
fn test_negative_concentration_fails() {
    let dir = tempdir().unwrap();
    write_qan(dir.path(), "X.qan", "S X\nC Si1 23.0 % Si\nC Fe1 -2.5 % Fe\n");
    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(
        status(&report, "Concentration values valid"),
        CheckStatus::Failed(msg) if msg.contains("X line 3 (-2.5)")
    ));
    assert!(matches!(
        status(&report, "Concentration lines well-formed"),
        CheckStatus::Warning(_)
    ));
    assert!(report.has_failures());
}

#[test]
fn test_metadata_problems() {
    let dir = tempdir().unwrap();
    good_folder(dir.path());
    ProjectMetadata {
        project_number: "42".to_string(),
        instrument: "Axios".to_string(),
        sample_type: "loose powder".to_string(),
        ..Default::default()
    }
    .save(dir.path())
    .unwrap();

    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(
        status(&report, "Project metadata"),
        CheckStatus::Warning(msg) if msg.contains("client_name") && msg.contains("operator")
    ));
    assert!(matches!(status(&report, "Instrument known"), CheckStatus::Warning(_)));
    assert!(matches!(status(&report, "Sample type"), CheckStatus::Warning(_)));

    fs::write(dir.path().join("metadata.json"), "{ not json").unwrap();
    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(status(&report, "Project metadata"), CheckStatus::Failed(_)));
}

#[test]
fn test_lookup_problems() {
    let dir = tempdir().unwrap();
    good_folder(dir.path());
    let lookup = LookupTable::from_entries(vec![
        LookupEntry {
            report_abbreviation: "S".to_string(),
            ..LookupEntry::new("BAS-01")
        },
        LookupEntry {
            report_abbreviation: "S".to_string(),
            ..LookupEntry::new("GRA-02")
        },
        LookupEntry::new("LOST-03"),
    ])
    .unwrap();
    lookup.save(dir.path()).unwrap();

    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(
        status(&report, "Lookup rows match samples"),
        CheckStatus::Warning(msg) if msg.contains("LOST-03")
    ));
    assert!(matches!(
        status(&report, "Report abbreviations unique"),
        CheckStatus::Warning(msg) if msg.contains('S')
    ));

    fs::write(
        dir.path().join("sample_lookup.csv"),
        "sample_id,notebook_id,client_id,report_abbreviation\nBAS-01,,,\nBAS-01,,,\n",
    )
    .unwrap();
    let report = validate_folder(dir.path(), &settings()).unwrap();
    assert!(matches!(status(&report, "Lookup sample IDs unique"), CheckStatus::Failed(_)));
    assert!(report.has_failures());
}
