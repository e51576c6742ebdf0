use super::*;
use crate::export::{melt_samples, LongRecord};
use crate::metadata::ProjectMetadata;
use crate::qan::{Measurement, Unit};
use crate::tables::{
    generate_tables, Basis, ElementClass, SampleData, Species, TableKind, TableOptions,
};
use proptest::prelude::*;
use tempfile::tempdir;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G'];

fn m(element: &str, percent: f64) -> Measurement {
    Measurement {
        element: element.to_string(),
        omnian_scan: element.to_string(),
        concentration: percent,
        unit: Unit::Percent,
        signal: None,
    }
}

fn record(sample_id: &str, element: &str, weight_percent: f64) -> LongRecord {
    LongRecord {
        line: 0,
        sample_id: sample_id.to_string(),
        notebook_id: String::new(),
        client_id: String::new(),
        report_abbreviation: String::new(),
        z: crate::chemistry::analyte_z(element),
        element: element.to_string(),
        concentration: weight_percent,
        unit: "%".to_string(),
        weight_percent,
        omnian: String::new(),
        oxide: None,
        oxide_weight_percent: None,
        table: None,
    }
}

fn basalt() -> SampleData {
    SampleData::new(
        "BAS-01",
        vec![
            m("Na", 2.1),
            m("Mg", 4.5),
            m("Al", 8.0),
            m("Si", 23.0),
            m("K", 0.8),
            m("Ca", 6.5),
            m("Fe", 7.0),
        ],
    )
}

#[test]
fn test_normalize() {
    let n = normalize([20.0, 30.0, 50.0]).unwrap();
    assert_eq!(n, [20.0, 30.0, 50.0]);

    let n = normalize([1.0, 1.0, 2.0]).unwrap();
    assert_eq!(n, [25.0, 25.0, 50.0]);

    assert!(normalize([0.0, 0.0, 0.0]).is_none());
    assert!(normalize([-1.0, 2.0, 3.0]).is_none());
    assert!(normalize([f64::NAN, 2.0, 3.0]).is_none());
}

proptest! {
    #[test]
    fn prop_normalized_sum_is_100(a in 0.0f64..1e4, b in 0.0f64..1e4, c in 0.001f64..1e4) {
        let n = normalize([a, b, c]).unwrap();
        prop_assert!((n.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        prop_assert!(n.iter().all(|v| (0.0..=100.0 + 1e-9).contains(v)));
    }
}

#[test]
fn test_systems() {
    assert_eq!(available_systems().len(), 5);
    assert_eq!(find_system("cao-al2o3-sio2").unwrap().name, "CaO-Al2O3-SiO2");
    assert!(find_system("Quartz-Feldspar-Mica").is_none());
    assert!(matches!(system("nope"), Err(TernaryError::UnknownSystem(_))));

    let afm = system("AFM (Na2O+K2O-FeO+Fe2O3-MgO)").unwrap();
    assert_eq!(afm.labels(), ["Na2O+K2O", "FeO+Fe2O3", "MgO"]);
    assert!(afm.components[0].includes("K2O"));
    assert_eq!(afm.file_stem(), "AFM_Na2OplusK2O-FeOplusFe2O3-MgO");
}

#[test]
fn test_extract_from_tables() {
    let tables = generate_tables(&[basalt()], &TableOptions::default(), &[]).unwrap();
    let cas = system("CaO-Al2O3-SiO2").unwrap();
    let dataset = extract_from_tables(cas, &tables).unwrap();

    assert_eq!(dataset.source.to_string(), "tables relative_major_oxides");
    assert_eq!(dataset.len(), 1);
    let point = &dataset.points[0];
    assert_eq!(point.sample_id, "BAS-01");
    assert!((point.values.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    // SiO2 dominates
    assert!(point.values[2] > point.values[0] && point.values[2] > point.values[1]);
}

#[test]
fn test_component_split_across_major_and_trace_tables() {
    let samples = vec![
        SampleData::new("A", vec![m("Si", 25.0), m("Al", 8.0), m("Fe", 5.0)]),
        SampleData::new("B", vec![m("Si", 30.0), m("Al", 7.0), m("Fe", 0.05)]),
    ];
    let tables = generate_tables(&samples, &TableOptions::default(), &[]).unwrap();
    let saf = system("SiO2-Al2O3-Fe2O3").unwrap();
    let dataset = extract(saf, &tables, &melt_samples(&samples));

    let major = TableKind::new(Basis::Relative, ElementClass::Major, Species::Oxides);
    let trace = TableKind::new(Basis::Relative, ElementClass::Trace, Species::Oxides);
    assert_eq!(dataset.source, DataSource::Tables(vec![major, trace]));
    assert!(dataset.skipped.is_empty(), "{:?}", dataset.skipped);
    let labels: Vec<&str> = dataset.points.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, ["A", "B"]);

    // B's iron is trace, so it comes from the ppm table converted to wt.%
    let major_table = tables.get(major).unwrap();
    let fe2o3 = tables.get(trace).unwrap().value("Fe2O3", "B").unwrap() * 1e-4;
    let expected = normalize([
        major_table.value("SiO2", "B").unwrap(),
        major_table.value("Al2O3", "B").unwrap(),
        fe2o3,
    ])
    .unwrap();
    for (value, expected) in dataset.points[1].values.iter().zip(expected) {
        assert!((value - expected).abs() < 1e-9);
    }
}

#[test]
fn test_afm_sums_composite_components() {
    let records = vec![
        record("S1", "Na2O", 3.0),
        record("S1", "K2O", 1.0),
        record("S1", "FeO", 2.0),
        record("S1", "Fe2O3", 2.0),
        record("S1", "MgO", 2.0),
    ];
    let afm = system("AFM (Na2O+K2O-FeO+Fe2O3-MgO)").unwrap();
    let dataset = extract_from_records(afm, &records);
    assert_eq!(dataset.triples(), vec![[40.0, 40.0, 20.0]]);
}

#[test]
fn test_skipped_samples() {
    let records = vec![
        record("S1", "SiO2", 50.0),
        record("S1", "Al2O3", 15.0),
        record("S1", "Fe2O3", 10.0),
        record("S2", "SiO2", 0.0),
        record("S2", "Al2O3", 0.0),
        record("S2", "Fe2O3", 0.0),
        record("S3", "SiO2", 70.0),
        record("S3", "Al2O3", 12.0),
    ];
    let saf = system("SiO2-Al2O3-Fe2O3").unwrap();
    let dataset = extract_from_records(saf, &records);

    assert_eq!(dataset.len(), 1);
    assert_eq!(dataset.points[0].sample_id, "S1");
    assert_eq!(
        dataset.skipped,
        vec![
            SkippedSample {
                label: "S2".to_string(),
                reason: SkipReason::ZeroSum
            },
            SkippedSample {
                label: "S3".to_string(),
                reason: SkipReason::MissingComponent("Fe2O3".to_string())
            },
        ]
    );
}

#[test]
fn test_extract_falls_back_to_records() {
    let samples = vec![basalt()];
    let tables = generate_tables(&samples, &TableOptions::default(), &[]).unwrap();
    let records = melt_samples(&samples);

    // Element symbols only appear in element tables, and Fe-Ti-O needs Ti and O
    let fto = system("Fe-Ti-O").unwrap();
    let dataset = extract(fto, &tables, &records);
    assert_eq!(dataset.source, DataSource::LongForm);
    assert!(dataset.is_empty());
    assert_eq!(dataset.skipped.len(), 1);
}

#[test]
fn test_write_csv() {
    let records = vec![
        record("S1", "CaO", 10.0),
        record("S1", "Al2O3", 30.0),
        record("S1", "SiO2", 60.0),
    ];
    let dataset = extract_from_records(system("CaO-Al2O3-SiO2").unwrap(), &records);
    let mut buffer = Vec::new();
    dataset.write_csv(&mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert_eq!(text, "Sample ID,CaO,Al2O3,SiO2\nS1,10.00,30.00,60.00\n");
}

#[test]
fn test_image_format() {
    assert_eq!(image_format("a.svg"), ImageFormat::Svg);
    assert_eq!(image_format("a.PNG"), ImageFormat::Png);
    assert_eq!(image_format("a.pdf"), ImageFormat::Pdf);
    assert_eq!(image_format("a.jpg"), ImageFormat::Png);
    assert_eq!(image_format("a"), ImageFormat::Png);
}

#[test]
fn test_render() {
    let dir = tempdir().unwrap();
    let samples = vec![basalt()];
    let tables = generate_tables(&samples, &TableOptions::default(), &[]).unwrap();
    let dataset = extract(system("SiO2-Al2O3-Fe2O3").unwrap(), &tables, &[]);

    let options = PlotOptions {
        grid_style: GridStyle::WhiteOnBlack,
        show_labels: true,
        caption: Some("Figure 1".to_string()),
        ..Default::default()
    };
    let svg = dir.path().join("diagram.svg");
    render(&dataset, &svg, &options).unwrap();
    let content = std::fs::read_to_string(&svg).unwrap();
    assert!(content.contains("<svg"));
    assert!(content.contains("Ternary Diagram: SiO2-Al2O3-Fe2O3"));

    let png = dir.path().join("diagram.png");
    render(&dataset, &png, &PlotOptions::default()).unwrap();
    let bytes = std::fs::read(&png).unwrap();
    assert!(bytes.starts_with(PNG_SIGNATURE));

    let pdf = dir.path().join("diagram.pdf");
    render(&dataset, &pdf, &options).unwrap();
    assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));

    let empty = extract_from_records(system("Fe-Ti-O").unwrap(), &[]);
    assert!(matches!(
        render(&empty, dir.path().join("empty.svg"), &options),
        Err(TernaryError::NoData(_))
    ));
}

#[test]
fn test_unknown_extension_writes_png() {
    let dir = tempdir().unwrap();
    let tables = generate_tables(&[basalt()], &TableOptions::default(), &[]).unwrap();
    let dataset = extract(system("SiO2-Al2O3-Fe2O3").unwrap(), &tables, &[]);

    for name in ["diagram.dat", "diagram.jpg"] {
        let path = dir.path().join(name);
        render(&dataset, &path, &PlotOptions::default()).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(PNG_SIGNATURE), "{}", name);
    }
}

#[test]
fn test_png_carries_text() {
    let dir = tempdir().unwrap();
    let tables = generate_tables(&[basalt()], &TableOptions::default(), &[]).unwrap();
    let dataset = extract(system("SiO2-Al2O3-Fe2O3").unwrap(), &tables, &[]);

    let plain = dir.path().join("plain.png");
    render(&dataset, &plain, &PlotOptions::default()).unwrap();
    let captioned = dir.path().join("captioned.png");
    let options = PlotOptions {
        caption: Some("Figure 1".to_string()),
        ..Default::default()
    };
    render(&dataset, &captioned, &options).unwrap();

    assert_ne!(std::fs::read(&plain).unwrap(), std::fs::read(&captioned).unwrap());
}

#[test]
fn test_suggested_filename() {
    let metadata = ProjectMetadata {
        client_name: "Acme".to_string(),
        project_name: "Copper Ridge".to_string(),
        ..Default::default()
    };
    let cas = system("CaO-Al2O3-SiO2").unwrap();
    assert_eq!(suggested_filename(cas, &metadata), "CaO-Al2O3-SiO2_Acme_Copper Ridge.png");
    assert_eq!(
        suggested_filename(cas, &ProjectMetadata::default()),
        "CaO-Al2O3-SiO2_Client_Project.png"
    );
}
