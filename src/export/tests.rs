use super::*;
use crate::metadata::{LookupEntry, LookupTable, ProjectMetadata};
use crate::qan::{Measurement, Unit};
use crate::tables::{
    generate_tables, Basis, ElementClass, GeneratedTables, Rounding, SampleData, Species,
    TableKind, TableOptions,
};
use tempfile::tempdir;

fn m(element: &str, concentration: f64, unit: &str) -> Measurement {
    Measurement {
        element: element.to_string(),
        omnian_scan: format!("{}5", element),
        concentration,
        unit: Unit::parse(unit),
        signal: None,
    }
}

fn lookup() -> LookupTable {
    LookupTable::from_entries(vec![
        LookupEntry {
            sample_id: "BAS-01".to_string(),
            notebook_id: "NB-1".to_string(),
            client_id: "C-1".to_string(),
            report_abbreviation: "B1".to_string(),
        },
        LookupEntry::new("GRA-02"),
    ])
    .unwrap()
}

fn samples() -> Vec<SampleData> {
    let lookup = lookup();
    let mut basalt = SampleData::new(
        "BAS-01",
        vec![
            m("Si", 23.0, "%"),
            m("Al", 8.0, "%"),
            m("Fe", 7.0, "%"),
            m("Sr", 450.0, "ppm"),
            m("Rh", 40.0, "kcps"),
        ],
    );
    basalt.lookup = lookup.get("BAS-01");
    let granite = SampleData::new("GRA-02", vec![m("Si", 33.0, "%"), m("Rb", 0.0, "ppm")]);
    vec![basalt, granite]
}

fn tables(options: &TableOptions) -> GeneratedTables {
    generate_tables(&samples(), options, &[]).unwrap()
}

fn project() -> ProjectMetadata {
    ProjectMetadata {
        project_number: "12345".to_string(),
        project_name: "Copper Ridge".to_string(),
        client_name: "Acme".to_string(),
        ..Default::default()
    }
}

#[test]
fn test_caption_and_names() {
    let kind = TableKind::new(Basis::Absolute, ElementClass::Major, Species::Elements);
    assert_eq!(
        caption(kind, &project()),
        "Table X. Absolute major element concentrations (wt.%) for 12345 Copper Ridge (Acme)"
    );

    let oxides = TableKind::new(Basis::Relative, ElementClass::Trace, Species::Oxides);
    assert_eq!(
        caption(oxides, &ProjectMetadata::default()),
        "Table X. Relative trace element concentrations reported as oxides (ppm)"
    );

    assert_eq!(sheet_name(oxides), "Relative Trace Oxides");
    assert_eq!(default_workbook_name(&project()), "12345_Copper Ridge_XRF_Tables.xlsx");
    assert_eq!(default_csv_name(&project()), "12345_Copper Ridge_XRF_concatenated.csv");
    assert_eq!(default_workbook_name(&ProjectMetadata::default()), DEFAULT_WORKBOOK_NAME);
    assert_eq!(default_csv_name(&ProjectMetadata::default()), DEFAULT_CSV_NAME);
}

#[test]
fn test_melt_tables_priority_and_fields() {
    let generated = tables(&TableOptions::default());
    let records = melt_tables(&generated, &lookup());

    // Relative major oxides come first
    let first = &records[0];
    assert_eq!(first.line, 1);
    assert_eq!(first.table.map(|k| k.key()).as_deref(), Some("relative_major_oxides"));
    assert_eq!(first.sample_id, "BAS-01");
    assert_eq!(first.notebook_id, "NB-1");
    assert_eq!(first.report_abbreviation, "B1");
    assert_eq!(first.unit, "%");
    assert_eq!(first.oxide.as_deref(), Some(first.element.as_str()));

    // Trace element rows carry wt.% and the oxide equivalent
    let sr = records
        .iter()
        .find(|r| r.element == "Sr" && r.table.map(|k| k.basis) == Some(Basis::Absolute))
        .unwrap();
    assert_eq!(sr.unit, "ppm");
    assert_eq!(sr.concentration, 450.0);
    assert!((sr.weight_percent - 0.045).abs() < 1e-12);
    assert_eq!(sr.oxide.as_deref(), Some("SrO"));
    assert!(sr.oxide_weight_percent.unwrap() > sr.weight_percent);

    // Summary rows and zero values never appear
    assert!(records.iter().all(|r| !["Total", "Balance", "Trace"].contains(&r.element.as_str())));
    assert!(records.iter().all(|r| r.element != "Rb"));

    let lines: Vec<_> = records.iter().map(|r| r.line).collect();
    assert_eq!(lines, (1..=records.len()).collect::<Vec<_>>());
}

#[test]
fn test_melt_samples() {
    let records = melt_samples(&samples());
    let elements: Vec<_> = records.iter().map(|r| r.element.as_str()).collect();
    assert_eq!(elements, vec!["Si", "Al", "Fe", "Sr", "Si"]);

    let fe = &records[2];
    assert_eq!(fe.z, 26);
    assert_eq!(fe.omnian, "Fe5");
    assert_eq!(fe.oxide.as_deref(), Some("Fe2O3"));
    assert!((fe.oxide_weight_percent.unwrap() - 7.0 * 1.4297).abs() < 1e-9);
    assert_eq!(records[4].sample_id, "GRA-02");
    assert!(records[4].report_abbreviation.is_empty());
}

#[test]
fn test_long_csv_roundtrip() {
    let records = melt_samples(&samples());
    let mut buffer = Vec::new();
    write_long_csv(&records, &mut buffer).unwrap();

    let text = String::from_utf8(buffer.clone()).unwrap();
    assert!(text.starts_with(&LONG_COLUMNS.join(",")));

    let restored = read_long_csv(buffer.as_slice()).unwrap();
    assert_eq!(restored, records);
}

#[test]
fn test_read_long_csv_minimal_columns() {
    let csv = "Sample ID,Element,Wt.%\nS1,SiO2,60.5\nS1,Al2O3,\n";
    let records = read_long_csv(csv.as_bytes()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].z, 14);
    assert_eq!(records[0].weight_percent, 60.5);
    assert_eq!(records[1].weight_percent, 0.0);

    assert!(matches!(
        read_long_csv("Sample ID,Element\nS1,Si\n".as_bytes()),
        Err(ExportError::MissingColumn(c)) if c == "Wt.%"
    ));
    assert!(matches!(
        read_long_csv("Sample ID,Element,Wt.%\nS1,Si,abc\n".as_bytes()),
        Err(ExportError::InvalidValue { row: 1, .. })
    ));
}

#[test]
fn test_table_csv_roundtrip() {
    let generated = tables(&TableOptions::default());
    for table in generated.iter() {
        let mut buffer = Vec::new();
        write_table_csv(table, &mut buffer, "ND").unwrap();
        let restored = read_table_csv(buffer.as_slice(), table.kind, table.rounding).unwrap();

        assert_eq!(restored.columns, table.columns);
        assert_eq!(restored.rows.len(), table.rows.len());
        let tolerance = 0.5 * 10f64.powi(-(table.rounding.decimals() as i32));
        for (a, b) in restored.rows.iter().zip(&table.rows) {
            assert_eq!(a.label, b.label);
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.z, b.z);
            for (x, y) in a.values.iter().zip(&b.values) {
                match (x, y) {
                    (Some(x), Some(y)) => assert!((x - y).abs() <= tolerance),
                    (None, None) => {}
                    _ => panic!("missing value mismatch in {}", a.label),
                }
            }
        }
    }
}

#[test]
fn test_table_csv_layout() {
    let options = TableOptions {
        relative: false,
        oxides: false,
        trace: false,
        ..Default::default()
    };
    let generated = tables(&options);
    let table = generated.iter().next().unwrap();
    let mut buffer = Vec::new();
    write_table_csv(table, &mut buffer, "---").unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<_> = text.lines().collect();

    assert_eq!(lines[0], "Z,Element,B1,GRA-02");
    assert_eq!(lines[1], "13,Al,8.00,---");
    assert_eq!(lines.last().copied(), Some(",Total,100.00,100.00"));
    assert_eq!(format_value(Some(460.0), Rounding::Tens, "---"), "460");
}

#[test]
fn test_write_workbook() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(default_workbook_name(&project()));
    write_workbook(&path, &tables(&TableOptions::default()), &project(), &lookup(), "---").unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"PK"));

    let empty = GeneratedTables::default();
    assert!(matches!(
        build_workbook(&empty, &project(), &lookup(), "---"),
        Err(ExportError::Empty(_))
    ));
}

#[test]
fn test_save_table_csvs() {
    let dir = tempdir().unwrap();
    let generated = tables(&TableOptions::default());
    let written = save_table_csvs(&generated, dir.path(), "---").unwrap();
    assert_eq!(written.len(), generated.len());
    assert!(dir.path().join("absolute_major_elements.csv").exists());
}
