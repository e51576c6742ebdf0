//! Long-form ("concatenated") records: one row per sample and analyte.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::ExportError;
use crate::chemistry::{analyte_z, atomic_number, base_element, oxide_for};
use crate::metadata::{LookupEntry, LookupTable};
use crate::tables::{GeneratedTables, SampleData, TableKind};

/// Column order of the concatenated CSV
pub const LONG_COLUMNS: [&str; 13] = [
    "Line",
    "Sample ID",
    "Notebook ID",
    "Client ID",
    "Report Abbreviation",
    "Z",
    "Element",
    "Concentration",
    "Unit",
    "Wt.%",
    "Omnian",
    "Oxide",
    "OxideConc.wt%",
];

/// One row of the concatenated CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongRecord {
    /// 1-based row number
    #[serde(rename = "Line")]
    pub line: usize,
    /// Instrument sample ID
    #[serde(rename = "Sample ID")]
    pub sample_id: String,
    /// Laboratory notebook ID
    #[serde(rename = "Notebook ID", default)]
    pub notebook_id: String,
    /// Client-supplied sample ID
    #[serde(rename = "Client ID", default)]
    pub client_id: String,
    /// Report column label
    #[serde(rename = "Report Abbreviation", default)]
    pub report_abbreviation: String,
    /// Atomic number of the (base) element
    #[serde(rename = "Z")]
    pub z: u8,
    /// Element symbol, or oxide formula for rows taken from oxide tables
    #[serde(rename = "Element")]
    pub element: String,
    /// Value in `unit`
    #[serde(rename = "Concentration")]
    pub concentration: f64,
    /// `%` or `ppm`
    #[serde(rename = "Unit")]
    pub unit: String,
    /// Value in weight percent
    #[serde(rename = "Wt.%")]
    pub weight_percent: f64,
    /// Omnian scan name (raw QAN data only)
    #[serde(rename = "Omnian", default)]
    pub omnian: String,
    /// Reporting oxide formula
    #[serde(rename = "Oxide", default)]
    pub oxide: Option<String>,
    /// Oxide concentration in weight percent
    #[serde(rename = "OxideConc.wt%", default)]
    pub oxide_weight_percent: Option<f64>,
    /// Table the row was taken from (`None` for raw QAN data)
    #[serde(skip)]
    pub table: Option<TableKind>,
}

impl LongRecord {
    fn with_lookup(lookup: &LookupEntry) -> Self {
        Self {
            line: 0,
            sample_id: lookup.sample_id.clone(),
            notebook_id: lookup.notebook_id.clone(),
            client_id: lookup.client_id.clone(),
            report_abbreviation: lookup.report_abbreviation.clone(),
            z: 0,
            element: String::new(),
            concentration: 0.0,
            unit: String::new(),
            weight_percent: 0.0,
            omnian: String::new(),
            oxide: None,
            oxide_weight_percent: None,
            table: None,
        }
    }

    /// Column label of the sample (report abbreviation, else sample ID)
    pub fn sample_label(&self) -> &str {
        if self.report_abbreviation.trim().is_empty() {
            &self.sample_id
        } else {
            &self.report_abbreviation
        }
    }
}

fn number_lines(records: &mut [LongRecord]) {
    for (idx, record) in records.iter_mut().enumerate() {
        record.line = idx + 1;
    }
}

/// Melt generated tables into long-form records.
///
/// Tables are visited in [`TableKind::MELT_PRIORITY`] order. Summary rows and
/// missing or non-positive cells are skipped. Sample columns are matched to
/// the lookup table by report abbreviation or sample ID.
pub fn melt_tables(tables: &GeneratedTables, lookup: &LookupTable) -> Vec<LongRecord> {
    let mut records = Vec::new();

    for table in tables.in_priority_order() {
        let kind = table.kind;
        let unit = if kind.is_major() { "%" } else { "ppm" };

        for (idx, column) in table.columns.iter().enumerate() {
            let sample_id = table.sample_ids.get(idx).unwrap_or(column);
            let entry = lookup
                .find(sample_id)
                .or_else(|| lookup.find_by_label(column))
                .cloned()
                .unwrap_or_else(|| LookupEntry {
                    report_abbreviation: column.clone(),
                    ..LookupEntry::new(sample_id.clone())
                });

            for row in table.analyte_rows() {
                let Some(value) = row.values.get(idx).copied().flatten() else {
                    continue;
                };
                if value <= 0.0 {
                    continue;
                }
                let weight_percent = value * kind.weight_percent_factor();

                let (oxide, oxide_weight_percent) = if kind.is_oxide() {
                    (Some(row.label.clone()), Some(weight_percent))
                } else {
                    match base_element(&row.label).and_then(oxide_for) {
                        Some(o) => (Some(o.formula.to_string()), Some(o.convert(weight_percent))),
                        None => (None, None),
                    }
                };

                records.push(LongRecord {
                    z: row.z.unwrap_or_else(|| analyte_z(&row.label)),
                    element: row.label.clone(),
                    concentration: value,
                    unit: unit.to_string(),
                    weight_percent,
                    oxide,
                    oxide_weight_percent,
                    table: Some(kind),
                    ..LongRecord::with_lookup(&entry)
                });
            }
        }
        debug!("Melted {} into {} records so far", kind, records.len());
    }

    number_lines(&mut records);
    records
}

/// Long-form records straight from raw QAN measurements.
///
/// Non-concentration units and non-positive values are skipped; the Omnian
/// scan name is kept. Lookup data comes from each sample.
pub fn melt_samples(samples: &[SampleData]) -> Vec<LongRecord> {
    let mut records = Vec::new();

    for sample in samples {
        for measurement in &sample.measurements {
            if measurement.concentration <= 0.0 {
                continue;
            }
            let Some(weight_percent) = measurement.weight_percent() else {
                continue;
            };
            let oxide = oxide_for(&measurement.element);

            records.push(LongRecord {
                z: atomic_number(&measurement.element).unwrap_or(0),
                element: measurement.element.clone(),
                concentration: measurement.concentration,
                unit: measurement.unit.to_string(),
                weight_percent,
                omnian: measurement.omnian_scan.clone(),
                oxide: oxide.map(|o| o.formula.to_string()),
                oxide_weight_percent: oxide.map(|o| o.convert(weight_percent)),
                ..LongRecord::with_lookup(&sample.lookup)
            });
        }
    }

    number_lines(&mut records);
    records
}

/// Write long-form records as CSV (header always present)
pub fn write_long_csv<W: Write>(records: &[LongRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(LONG_COLUMNS)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write long-form records to a CSV file
pub fn save_long_csv<P: AsRef<Path>>(records: &[LongRecord], path: P) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_long_csv(records, File::create(path)?)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read long-form records from CSV.
///
/// Requires the `Sample ID`, `Element` and `Wt.%` columns; the other columns
/// may be absent.
pub fn read_long_csv<R: Read>(reader: R) -> Result<Vec<LongRecord>, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["Sample ID", "Element", "Wt.%"] {
        if !headers.iter().any(|h| h == required) {
            return Err(ExportError::MissingColumn(required.to_string()));
        }
    }

    let column = |name: &str| headers.iter().position(|h| h == name);
    let sample_idx = column("Sample ID");
    let element_idx = column("Element");

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = result?;
        let field = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("").to_string();
        let number = |name: &str| -> Result<Option<f64>, ExportError> {
            let text = field(column(name));
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>()
                .map(Some)
                .map_err(|_| ExportError::InvalidValue { row: row + 1, value: text })
        };

        let element = field(element_idx);
        let weight_percent = number("Wt.%")?.unwrap_or(0.0);
        let oxide = field(column("Oxide"));

        records.push(LongRecord {
            line: number("Line")?.map(|v| v as usize).unwrap_or(row + 1),
            sample_id: field(sample_idx),
            notebook_id: field(column("Notebook ID")),
            client_id: field(column("Client ID")),
            report_abbreviation: field(column("Report Abbreviation")),
            z: number("Z")?.map(|v| v as u8).unwrap_or_else(|| analyte_z(&element)),
            concentration: number("Concentration")?.unwrap_or(weight_percent),
            unit: field(column("Unit")),
            weight_percent,
            omnian: field(column("Omnian")),
            oxide: if oxide.is_empty() { None } else { Some(oxide) },
            oxide_weight_percent: number("OxideConc.wt%")?,
            table: None,
            element,
        });
    }
    Ok(records)
}

/// Read long-form records from a CSV file
pub fn load_long_csv<P: AsRef<Path>>(path: P) -> Result<Vec<LongRecord>, ExportError> {
    read_long_csv(File::open(path)?)
}
