use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::element::{classify, is_included, normalization_factor};
use super::{
    Basis, ConcentrationTable, ElementClass, RowKind, SampleData, Species, TableError, TableKind,
    TableOptions, TableRow,
};
use crate::chemistry::{analyte_z, atomic_number, oxide_for};
use crate::metadata::{LookupTable, ProjectMetadata, Settings};
use crate::qan::{find_qan_files, read_qan_file};

/// A sample that needs attention in the generated tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleFlag {
    /// Instrument sample ID
    pub sample_id: String,
    /// What is wrong
    pub reason: String,
}

/// Tables produced for a set of samples
#[derive(Debug, Clone, Default)]
pub struct GeneratedTables {
    /// Tables in report order
    pub tables: Vec<ConcentrationTable>,
    /// Samples that could not be fully processed
    pub flags: Vec<SampleFlag>,
}

impl GeneratedTables {
    /// Table of a given kind
    pub fn get(&self, kind: TableKind) -> Option<&ConcentrationTable> {
        self.tables.iter().find(|t| t.kind == kind)
    }

    /// Tables in report order
    pub fn iter(&self) -> impl Iterator<Item = &ConcentrationTable> {
        self.tables.iter()
    }

    /// Tables in long-form priority order
    pub fn in_priority_order(&self) -> impl Iterator<Item = &ConcentrationTable> {
        TableKind::MELT_PRIORITY
            .into_iter()
            .filter_map(move |kind| self.get(kind))
    }

    /// Number of tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table was generated
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Everything derived from one XRF folder
#[derive(Debug, Clone)]
pub struct ProcessedFolder {
    /// Samples in folder order
    pub samples: Vec<SampleData>,
    /// Generated tables
    pub tables: GeneratedTables,
    /// Options after sample-type adjustment
    pub options: TableOptions,
    /// Elements left out of every table
    pub ignored_elements: Vec<String>,
    /// QAN files that could not be read, with the error
    pub failed_files: Vec<(PathBuf, String)>,
}

fn options_include(options: &TableOptions, kind: TableKind) -> bool {
    let basis = match kind.basis {
        Basis::Absolute => options.absolute,
        Basis::Relative => options.relative,
    };
    let class = match kind.class {
        ElementClass::Major => options.major,
        ElementClass::Trace => options.trace,
    };
    let species = kind.species == Species::Elements || options.oxides;
    basis && class && species
}

/// Build one table without summary rows.
///
/// `factors` holds the normalization factor of each sample; it is only used
/// for relative tables, where samples without a factor get no values.
pub fn derive_table(
    samples: &[SampleData],
    kind: TableKind,
    options: &TableOptions,
    ignore: &[String],
    factors: &[Option<f64>],
) -> Result<ConcentrationTable, TableError> {
    let rounding = match kind.class {
        ElementClass::Major => options.major_rounding()?,
        ElementClass::Trace => options.trace_rounding()?,
    };

    let mut cells: BTreeMap<(u8, String), Vec<Option<f64>>> = BTreeMap::new();
    for (idx, sample) in samples.iter().enumerate() {
        let factor = match kind.basis {
            Basis::Absolute => Some(1.0),
            Basis::Relative => factors.get(idx).copied().flatten(),
        };

        for measurement in &sample.measurements {
            if !is_included(measurement, ignore) || classify(measurement) != Some(kind.class) {
                continue;
            }
            // Cells are expressed in the table unit (wt.% or ppm)
            let Some(percent) = measurement.weight_percent() else {
                continue;
            };
            let value = percent / kind.weight_percent_factor();
            let (label, z, value) = match kind.species {
                Species::Elements => (
                    measurement.element.clone(),
                    atomic_number(&measurement.element).unwrap_or(0),
                    value,
                ),
                Species::Oxides => match oxide_for(&measurement.element) {
                    Some(oxide) => (
                        oxide.formula.to_string(),
                        analyte_z(&measurement.element),
                        oxide.convert(value),
                    ),
                    None => continue,
                },
            };

            let row = cells
                .entry((z, label))
                .or_insert_with(|| vec![None; samples.len()]);
            row[idx] = factor.map(|f| rounding.apply(value * f));
        }
    }

    let mut table = ConcentrationTable::new(
        kind,
        samples.iter().map(|s| s.column_label().to_string()).collect(),
        samples.iter().map(|s| s.sample_id().to_string()).collect(),
        rounding,
    );
    table.rows = cells
        .into_iter()
        .map(|((z, label), values)| TableRow {
            z: Some(z),
            label,
            kind: RowKind::Analyte,
            values,
        })
        .collect();
    Ok(table)
}

/// Generate every table selected by `options` for a set of samples.
///
/// Elements in `ignore` are left out of the tables and of the relative
/// normalization total.
pub fn generate_tables(
    samples: &[SampleData],
    options: &TableOptions,
    ignore: &[String],
) -> Result<GeneratedTables, TableError> {
    options.validate()?;

    let mut flags = Vec::new();
    let factors: Vec<Option<f64>> = samples
        .iter()
        .map(|sample| {
            let factor = normalization_factor(&sample.measurements, ignore);
            if factor.is_none() && options.relative {
                warn!(
                    "Sample '{}' has no positive concentration total; it gets no relative values",
                    sample.sample_id()
                );
                flags.push(SampleFlag {
                    sample_id: sample.sample_id().to_string(),
                    reason: "non-positive concentration total, relative values omitted".to_string(),
                });
            }
            factor
        })
        .collect();

    let mut tables = Vec::new();
    for kind in TableKind::REPORT_ORDER {
        if !options_include(options, kind) {
            continue;
        }
        let table = derive_table(samples, kind, options, ignore, &factors)?;
        if table.has_analytes() {
            tables.push(table);
        } else {
            debug!("No analytes for {}, table skipped", kind);
        }
    }

    let trace_sums: Vec<Option<Vec<Option<f64>>>> = tables
        .iter()
        .map(|table| {
            if !table.kind.is_major() {
                return None;
            }
            let trace_kind = table.kind.with_class(ElementClass::Trace);
            tables
                .iter()
                .find(|t| t.kind == trace_kind)
                .map(|t| t.weight_percent_sums())
        })
        .collect();
    for (table, trace) in tables.iter_mut().zip(trace_sums) {
        table.add_summary_rows(trace.as_deref());
    }

    if tables.is_empty() {
        return Err(TableError::NoTablesGenerated);
    }

    info!("Generated {} table(s) for {} sample(s)", tables.len(), samples.len());
    Ok(GeneratedTables { tables, flags })
}

/// Read the QAN files of a folder and attach their lookup rows.
///
/// Files that fail to parse are logged and returned separately.
pub fn load_samples<P: AsRef<Path>>(
    folder: P,
    lookup: &LookupTable,
) -> Result<(Vec<SampleData>, Vec<(PathBuf, String)>), TableError> {
    let mut samples = Vec::new();
    let mut failed = Vec::new();
    for path in find_qan_files(folder)? {
        match read_qan_file(&path) {
            Ok(qan) => samples.push(SampleData::from_qan(qan, lookup)),
            Err(e) => {
                warn!("Error processing {}: {}", path.display(), e);
                failed.push((path, e.to_string()));
            }
        }
    }
    Ok((samples, failed))
}

/// Process every QAN file of an XRF folder into tables
pub fn process_folder<P: AsRef<Path>>(
    folder: P,
    metadata: &ProjectMetadata,
    lookup: &LookupTable,
    settings: &Settings,
    options: &TableOptions,
) -> Result<ProcessedFolder, TableError> {
    let folder = folder.as_ref();
    let (samples, failed_files) = load_samples(folder, lookup)?;
    if samples.is_empty() {
        return Err(TableError::NoSamples(folder.display().to_string()));
    }

    let options = options.for_sample_type(&metadata.sample_type);
    let ignored_elements = if options.ignore_tube_elements {
        settings.tube_elements(&metadata.instrument).to_vec()
    } else {
        Vec::new()
    };
    if !ignored_elements.is_empty() {
        info!("Ignoring tube elements: {}", ignored_elements.join(", "));
    }

    let tables = generate_tables(&samples, &options, &ignored_elements)?;
    Ok(ProcessedFolder {
        samples,
        tables,
        options,
        ignored_elements,
        failed_files,
    })
}
