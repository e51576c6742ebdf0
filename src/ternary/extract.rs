use log::{debug, info, warn};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::{TernaryError, TernarySystem};
use crate::export::LongRecord;
use crate::tables::{ConcentrationTable, GeneratedTables, TableKind};

/// Normalize a triple to a 100 total.
///
/// `None` when a value is negative or not finite, or the sum is not positive.
pub fn normalize(values: [f64; 3]) -> Option<[f64; 3]> {
    if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return None;
    }
    let sum: f64 = values.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return None;
    }
    Some(values.map(|v| v * 100.0 / sum))
}

/// Where the ternary values were taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Generated wide tables, in the order they contributed values
    Tables(Vec<TableKind>),
    /// Long-form records
    LongForm,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Tables(kinds) => {
                let keys: Vec<String> = kinds.iter().map(|k| k.key()).collect();
                write!(f, "tables {}", keys.join(", "))
            }
            DataSource::LongForm => f.write_str("long-form records"),
        }
    }
}

/// Why a sample was left out of a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// None of the species of a component is present
    MissingComponent(String),
    /// The three components sum to zero
    ZeroSum,
    /// A component is negative or not a number
    InvalidValue,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingComponent(c) => write!(f, "missing component {}", c),
            SkipReason::ZeroSum => f.write_str("components sum to zero"),
            SkipReason::InvalidValue => f.write_str("negative or non-finite component"),
        }
    }
}

/// A sample plotted on a ternary diagram
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryPoint {
    /// Instrument sample ID
    pub sample_id: String,
    /// Label shown on the diagram (report abbreviation or sample ID)
    pub label: String,
    /// Component values normalized to 100
    pub values: [f64; 3],
}

/// A sample that could not be plotted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSample {
    /// Sample label
    pub label: String,
    /// Why it was skipped
    pub reason: SkipReason,
}

/// Normalized ternary data of one system
#[derive(Debug, Clone, PartialEq)]
pub struct TernaryDataset {
    /// The ternary system
    pub system: &'static TernarySystem,
    /// Where the values came from
    pub source: DataSource,
    /// Plottable samples
    pub points: Vec<TernaryPoint>,
    /// Samples left out, with reasons
    pub skipped: Vec<SkippedSample>,
}

impl TernaryDataset {
    fn new(system: &'static TernarySystem, source: DataSource) -> Self {
        Self {
            system,
            source,
            points: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn push_sample(&mut self, sample_id: String, label: String, raw: Result<[f64; 3], SkipReason>) {
        let outcome = raw.and_then(|values| {
            if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
                Err(SkipReason::InvalidValue)
            } else {
                normalize(values).ok_or(SkipReason::ZeroSum)
            }
        });
        match outcome {
            Ok(values) => self.points.push(TernaryPoint {
                sample_id,
                label,
                values,
            }),
            Err(reason) => {
                debug!("{}: skipping sample '{}' ({})", self.system, label, reason);
                self.skipped.push(SkippedSample { label, reason });
            }
        }
    }

    fn log_summary(&self) {
        info!(
            "{}: {} point(s) from {}",
            self.system,
            self.points.len(),
            self.source
        );
        if !self.skipped.is_empty() {
            warn!("{}: {} sample(s) skipped", self.system, self.skipped.len());
        }
    }

    /// Number of plottable samples
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no sample can be plotted
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Normalized triples in sample order
    pub fn triples(&self) -> Vec<[f64; 3]> {
        self.points.iter().map(|p| p.values).collect()
    }

    /// Write the normalized table: `Sample ID` and the three components, two decimals
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TernaryError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let labels = self.system.labels();
        csv_writer.write_record(["Sample ID", labels[0], labels[1], labels[2]])?;
        for point in &self.points {
            csv_writer.write_record([
                point.label.clone(),
                format!("{:.2}", point.values[0]),
                format!("{:.2}", point.values[1]),
                format!("{:.2}", point.values[2]),
            ])?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the normalized table to a file
    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), TernaryError> {
        self.write_csv(File::create(path)?)
    }
}

/// Sum the species of each component; a component with no species present is missing
fn component_values<F>(system: &TernarySystem, lookup: F) -> Result<[f64; 3], SkipReason>
where
    F: Fn(&'static str) -> Option<f64>,
{
    let mut values = [0.0; 3];
    for (slot, component) in values.iter_mut().zip(&system.components) {
        let present: Vec<f64> = component.species.iter().filter_map(|s| lookup(*s)).collect();
        if present.is_empty() {
            return Err(SkipReason::MissingComponent(component.label.to_string()));
        }
        *slot = present.iter().sum();
    }
    Ok(values)
}

fn analyte_value(table: &ConcentrationTable, species: &str, idx: usize) -> Option<f64> {
    table
        .row(species)
        .filter(|row| row.is_analyte())
        .and_then(|row| row.values.get(idx).copied().flatten())
        .filter(|value| *value > 0.0)
}

fn tables_cover(tables: &GeneratedTables, system: &TernarySystem) -> bool {
    system.components.iter().all(|component| {
        tables.iter().any(|table| {
            component
                .species
                .iter()
                .any(|s| table.row(s).map_or(false, |row| row.is_analyte()))
        })
    })
}

/// Extract from generated tables.
///
/// Tables are walked in long-form priority order and, per sample and
/// species, the first positive value wins, converted to wt.%. A component
/// may therefore come from a major table for one sample and a trace table
/// for another. `None` when no table carries some component at all.
pub fn extract_from_tables(
    system: &'static TernarySystem,
    tables: &GeneratedTables,
) -> Option<TernaryDataset> {
    if !tables_cover(tables, system) {
        return None;
    }

    let mut samples: Vec<(String, String)> = Vec::new();
    let mut values: HashMap<(String, &'static str), f64> = HashMap::new();
    let mut contributing = Vec::new();

    for table in tables.in_priority_order() {
        let factor = table.kind.weight_percent_factor();
        let mut contributed = false;
        for (idx, label) in table.columns.iter().enumerate() {
            let sample_id = table.sample_ids.get(idx).unwrap_or(label);
            if !samples.iter().any(|(id, _)| id == sample_id) {
                samples.push((sample_id.clone(), label.clone()));
            }
            for species in system.species() {
                let Some(value) = analyte_value(table, species, idx) else {
                    continue;
                };
                if let Entry::Vacant(slot) = values.entry((sample_id.clone(), species)) {
                    slot.insert(value * factor);
                    contributed = true;
                }
            }
        }
        if contributed {
            contributing.push(table.kind);
        }
    }

    let mut dataset = TernaryDataset::new(system, DataSource::Tables(contributing));
    for (sample_id, label) in samples {
        let raw = component_values(system, |species| {
            values.get(&(sample_id.clone(), species)).copied()
        });
        dataset.push_sample(sample_id, label, raw);
    }

    dataset.log_summary();
    Some(dataset)
}

/// Extract from long-form records; the first record per sample and species wins
pub fn extract_from_records(system: &'static TernarySystem, records: &[LongRecord]) -> TernaryDataset {
    let mut samples: Vec<(String, String)> = Vec::new();
    let mut values: HashMap<(String, String), f64> = HashMap::new();

    for record in records {
        if !samples.iter().any(|(id, _)| *id == record.sample_id) {
            samples.push((record.sample_id.clone(), record.sample_label().to_string()));
        }
        if system.species().any(|s| s == record.element) {
            values
                .entry((record.sample_id.clone(), record.element.clone()))
                .or_insert(record.weight_percent);
        }
    }

    let mut dataset = TernaryDataset::new(system, DataSource::LongForm);
    for (sample_id, label) in samples {
        let raw = component_values(system, |species| {
            values.get(&(sample_id.clone(), species.to_string())).copied()
        });
        dataset.push_sample(sample_id, label, raw);
    }

    dataset.log_summary();
    dataset
}

/// Extract a system from generated tables, falling back to long-form records
pub fn extract(
    system: &'static TernarySystem,
    tables: &GeneratedTables,
    records: &[LongRecord],
) -> TernaryDataset {
    match extract_from_tables(system, tables) {
        Some(dataset) => dataset,
        None => {
            debug!("No table carries every component of {}, using long-form records", system);
            extract_from_records(system, records)
        }
    }
}
