//! End-to-end tests over a realistic XRF project folder
//!
//! The fixture mirrors the laboratory layout
//! `<Client>/Projects/<number>_<name>/Data/XRF` with QAN reports, project
//! metadata, a lookup table and an instrument settings file.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};
use xrftab::export::{
    default_csv_name, default_workbook_name, load_long_csv, melt_tables, read_table_csv,
    save_long_csv, save_table_csvs, write_workbook,
};
use xrftab::metadata::{LookupEntry, LookupTable, ProjectMetadata, Settings};
use xrftab::tables::{
    generate_tables, process_folder, Basis, ElementClass, SampleData, Species, TableKind,
    TableOptions,
};
use xrftab::ternary::{extract_from_records, find_system, render, PlotOptions, SkipReason};
use xrftab::validator::validate_folder;

const BASALT_QAN: &str = "\
Omnian quantification report
S BAS-01   Basalt pellet
C Na5   2.10000 %    Na          27.4968
C Mg3   4.50000 %    Mg          40.1000
C Al3   8.00000 %    Al          88.2100
C Si3   23.0000 %    Si         301.5000
C K3    0.80000 %    K           12.0000
C Ca3   6.50000 %    Ca          95.3000
C Ti3   0.70000 %    Ti          10.2000
C Fe3   7.00000 %    Fe         140.9000
C Rh2   3.00000 %    Rh          55.0000
";

const GRANITE_QAN: &str = "\
Omnian quantification report
S GRA-02   Granite pellet
C Si3   33.0000 %    Si         410.0000
C Al3   7.00000 %    Al          70.1000
C K3    4.00000 %    K           60.5000
C Sr1   456.000 ppm  Sr
C Zr1   0.01230 %    Zr
C Ba1   1500.00 ppm  Ba
C Nb1   n.d.    ppm  Nb
";

const SETTINGS_JSON: &str = r#"{
    "operators": ["JD"],
    "instruments": { "Zetium": { "tube_elements": ["Rh"] } }
}"#;

fn project_folder() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let folder = dir.path().join("Acme/Projects/42_Ridge/Data/XRF");
    fs::create_dir_all(&folder).unwrap();

    fs::write(folder.join("BAS-01.qan"), BASALT_QAN).unwrap();
    fs::write(folder.join("GRA-02.QAN"), GRANITE_QAN).unwrap();

    let mut metadata = ProjectMetadata::from_path(&folder);
    metadata.operator = "JD".to_string();
    metadata.instrument = "Zetium".to_string();
    metadata.save(&folder).unwrap();

    LookupTable::from_entries(vec![
        LookupEntry {
            notebook_id: "NB-7".to_string(),
            report_abbreviation: "B1".to_string(),
            ..LookupEntry::new("BAS-01")
        },
        LookupEntry::new("GRA-02"),
    ])
    .unwrap()
    .save(&folder)
    .unwrap();

    (dir, folder)
}

fn settings() -> Settings {
    Settings::from_json(SETTINGS_JSON).unwrap()
}

fn kind(basis: Basis, class: ElementClass, species: Species) -> TableKind {
    TableKind::new(basis, class, species)
}

#[test]
fn test_metadata_from_folder_path() {
    let (_dir, folder) = project_folder();
    let metadata = ProjectMetadata::load(&folder);
    assert_eq!(metadata.client_name, "Acme");
    assert_eq!(metadata.project_number, "42");
    assert_eq!(metadata.project_name, "Ridge");
    assert!(metadata.missing_fields().is_empty());
}

#[test]
fn test_validation_of_fixture() {
    let (_dir, folder) = project_folder();
    let report = validate_folder(&folder, &settings()).unwrap();

    assert!(!report.has_failures(), "{}", report);
    // The n.d. niobium line is reported, not fatal
    assert!(report.has_warnings());
    assert!(report.to_string().contains("Validation PASSED with warnings"));
}

#[test]
fn test_reference_absolute_major_oxides() {
    let (_dir, folder) = project_folder();
    let metadata = ProjectMetadata::load(&folder);
    let lookup = LookupTable::load(&folder).unwrap();

    let processed =
        process_folder(&folder, &metadata, &lookup, &settings(), &TableOptions::default())
            .unwrap();
    assert_eq!(processed.samples.len(), 2);
    assert_eq!(processed.ignored_elements, vec!["Rh".to_string()]);

    let table = processed
        .tables
        .get(kind(Basis::Absolute, ElementClass::Major, Species::Oxides))
        .unwrap();
    assert_eq!(table.columns, vec!["B1".to_string(), "GRA-02".to_string()]);

    let reference = [
        ("Na2O", 2.83),
        ("MgO", 7.46),
        ("Al2O3", 15.12),
        ("SiO2", 49.20),
        ("K2O", 0.96),
        ("CaO", 9.09),
        ("TiO2", 1.17),
        ("Fe2O3", 10.01),
        ("Balance", 4.16),
        ("Total", 100.0),
    ];
    for (label, expected) in reference {
        let value = table.value(label, "B1").unwrap();
        assert!((value - expected).abs() < 1e-9, "{}: {} != {}", label, value, expected);
    }
    assert!(table.row("Rh2O3").is_none());

    // Granite carries trace elements, so its major tables get a Trace row
    let trace = table.value("Trace", "GRA-02").unwrap();
    assert!(trace > 0.0);
}

#[test]
fn test_exports_roundtrip() {
    let (_dir, folder) = project_folder();
    let metadata = ProjectMetadata::load(&folder);
    let lookup = LookupTable::load(&folder).unwrap();
    let processed =
        process_folder(&folder, &metadata, &lookup, &settings(), &TableOptions::default())
            .unwrap();
    let tables = &processed.tables;

    let workbook = folder.join(default_workbook_name(&metadata));
    write_workbook(&workbook, tables, &metadata, &lookup, "---").unwrap();
    assert!(workbook.ends_with("42_Ridge_XRF_Tables.xlsx"));
    assert!(fs::read(&workbook).unwrap().starts_with(b"PK"));

    let out = folder.join("tables");
    fs::create_dir_all(&out).unwrap();
    let written = save_table_csvs(tables, &out, "---").unwrap();
    assert_eq!(written.len(), tables.len());
    for table in tables.iter() {
        let path = out.join(format!("{}.csv", table.kind.key()));
        let restored =
            read_table_csv(fs::File::open(&path).unwrap(), table.kind, table.rounding).unwrap();
        let tolerance = 0.5 * 10f64.powi(-(table.rounding.decimals() as i32)) + 1e-9;
        for (a, b) in restored.rows.iter().zip(&table.rows) {
            assert_eq!(a.label, b.label);
            for (x, y) in a.values.iter().zip(&b.values) {
                match (x, y) {
                    (Some(x), Some(y)) => assert!((x - y).abs() <= tolerance),
                    (None, None) => {}
                    _ => panic!("{} {}: missing value mismatch", table.kind, a.label),
                }
            }
        }
    }

    let records = melt_tables(tables, &lookup);
    let csv = folder.join(default_csv_name(&metadata));
    save_long_csv(&records, &csv).unwrap();
    let restored = load_long_csv(&csv).unwrap();
    assert_eq!(restored.len(), records.len());
    assert_eq!(restored[0].notebook_id, "NB-7");
    assert_eq!(restored[0].report_abbreviation, "B1");
}

#[test]
fn test_ternary_from_concatenated_csv() {
    let (_dir, folder) = project_folder();
    let metadata = ProjectMetadata::load(&folder);
    let lookup = LookupTable::load(&folder).unwrap();
    let processed =
        process_folder(&folder, &metadata, &lookup, &settings(), &TableOptions::default())
            .unwrap();
    let csv = folder.join(default_csv_name(&metadata));
    save_long_csv(&melt_tables(&processed.tables, &lookup), &csv).unwrap();

    let records = load_long_csv(&csv).unwrap();
    let system = find_system("CaO-Al2O3-SiO2").unwrap();
    let dataset = extract_from_records(system, &records);

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.points[0].label, "B1");
    let sum: f64 = dataset.points[0].values.iter().sum();
    assert!((sum - 100.0).abs() < 1e-9);
    assert_eq!(dataset.skipped.len(), 1);
    assert_eq!(dataset.skipped[0].reason, SkipReason::MissingComponent("CaO".to_string()));

    let diagram = folder.join("cas.svg");
    render(&dataset, &diagram, &PlotOptions::default()).unwrap();
    assert!(fs::read_to_string(&diagram).unwrap().contains("CaO"));
}

fn assert_close(path: &Path, a: f64, b: f64, tolerance: f64) {
    assert!((a - b).abs() <= tolerance, "{}: {} vs {}", path.display(), a, b);
}

#[test]
fn test_loose_powder_gets_relative_tables_only() {
    let (_dir, folder) = project_folder();
    let mut metadata = ProjectMetadata::load(&folder);
    metadata.sample_type = "loose powder".to_string();
    let lookup = LookupTable::load(&folder).unwrap();

    let processed =
        process_folder(&folder, &metadata, &lookup, &settings(), &TableOptions::default())
            .unwrap();
    assert!(!processed.options.absolute);
    assert!(processed.tables.iter().all(|t| t.kind.basis == Basis::Relative));

    let table = processed
        .tables
        .get(kind(Basis::Relative, ElementClass::Major, Species::Elements))
        .unwrap();
    let total = table.value("Total", "B1").unwrap();
    assert_close(&folder, total, 100.0, 0.05);
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use xrftab::qan::{Measurement, Unit};

    fn percent(element: &str, value: f64) -> Measurement {
        Measurement {
            element: element.to_string(),
            omnian_scan: element.to_string(),
            concentration: value,
            unit: Unit::Percent,
            signal: None,
        }
    }

    proptest! {
        /// Relative major tables always total 100 within rounding
        #[test]
        fn test_relative_total_is_100(
            si in 0.2f64..45.0,
            al in 0.2f64..20.0,
            fe in 0.2f64..20.0,
            ca in 0.2f64..20.0,
        ) {
            let sample = SampleData::new(
                "S1",
                vec![percent("Si", si), percent("Al", al), percent("Fe", fe), percent("Ca", ca)],
            );
            let options = TableOptions {
                absolute: false,
                trace: false,
                oxides: false,
                ..Default::default()
            };
            let tables = generate_tables(&[sample], &options, &[]).unwrap();
            let table = tables
                .get(kind(Basis::Relative, ElementClass::Major, Species::Elements))
                .unwrap();
            let total = table.value("Total", "S1").unwrap();
            prop_assert!((total - 100.0).abs() <= 0.02 + 1e-9);
        }
    }
}
