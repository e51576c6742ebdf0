use std::fmt;

use super::{ElementClass, Rounding};
use crate::chemistry::PPM_TO_PERCENT;

/// Concentration basis of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Basis {
    /// Values as measured
    Absolute,
    /// Values scaled so that each sample sums to 100 %
    Relative,
}

impl Basis {
    /// Lower-case name used in table keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::Absolute => "absolute",
            Basis::Relative => "relative",
        }
    }
}

/// Whether a table reports elements or their oxides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Element concentrations
    Elements,
    /// Oxide-equivalent concentrations
    Oxides,
}

impl Species {
    /// Lower-case name used in table keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Elements => "elements",
            Species::Oxides => "oxides",
        }
    }
}

/// Identity of a generated table: basis × class × species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKind {
    /// Absolute or relative
    pub basis: Basis,
    /// Major or trace
    pub class: ElementClass,
    /// Elements or oxides
    pub species: Species,
}

impl TableKind {
    /// Order in which tables are written to a report
    pub const REPORT_ORDER: [TableKind; 8] = [
        TableKind::new(Basis::Absolute, ElementClass::Major, Species::Elements),
        TableKind::new(Basis::Absolute, ElementClass::Trace, Species::Elements),
        TableKind::new(Basis::Relative, ElementClass::Major, Species::Elements),
        TableKind::new(Basis::Relative, ElementClass::Trace, Species::Elements),
        TableKind::new(Basis::Absolute, ElementClass::Major, Species::Oxides),
        TableKind::new(Basis::Absolute, ElementClass::Trace, Species::Oxides),
        TableKind::new(Basis::Relative, ElementClass::Major, Species::Oxides),
        TableKind::new(Basis::Relative, ElementClass::Trace, Species::Oxides),
    ];

    /// Order in which tables are searched when building long-form data
    pub const MELT_PRIORITY: [TableKind; 8] = [
        TableKind::new(Basis::Relative, ElementClass::Major, Species::Oxides),
        TableKind::new(Basis::Absolute, ElementClass::Major, Species::Oxides),
        TableKind::new(Basis::Relative, ElementClass::Trace, Species::Oxides),
        TableKind::new(Basis::Absolute, ElementClass::Trace, Species::Oxides),
        TableKind::new(Basis::Relative, ElementClass::Major, Species::Elements),
        TableKind::new(Basis::Absolute, ElementClass::Major, Species::Elements),
        TableKind::new(Basis::Relative, ElementClass::Trace, Species::Elements),
        TableKind::new(Basis::Absolute, ElementClass::Trace, Species::Elements),
    ];

    /// Create a table kind
    pub const fn new(basis: Basis, class: ElementClass, species: Species) -> Self {
        Self {
            basis,
            class,
            species,
        }
    }

    /// Same basis and species with another class
    pub fn with_class(self, class: ElementClass) -> Self {
        Self { class, ..self }
    }

    /// Key such as `absolute_major_elements`
    pub fn key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.basis.as_str(),
            self.class.as_str(),
            self.species.as_str()
        )
    }

    /// Parse a key produced by [`TableKind::key`]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::REPORT_ORDER.into_iter().find(|kind| kind.key() == key)
    }

    /// Title such as `Absolute Major Elements`
    pub fn title(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether this is a major table
    pub fn is_major(&self) -> bool {
        self.class == ElementClass::Major
    }

    /// Whether this table reports oxides
    pub fn is_oxide(&self) -> bool {
        self.species == Species::Oxides
    }

    /// Reporting unit of the table cells
    pub fn unit(&self) -> &'static str {
        match self.class {
            ElementClass::Major => "wt.%",
            ElementClass::Trace => "ppm",
        }
    }

    /// Factor from a cell value to weight percent
    pub fn weight_percent_factor(&self) -> f64 {
        match self.class {
            ElementClass::Major => 1.0,
            ElementClass::Trace => PPM_TO_PERCENT,
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Role of a table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// An element or oxide
    Analyte,
    /// Sum of the trace elements in wt.%
    Trace,
    /// Remainder up to 100 %
    Balance,
    /// Column total
    Total,
}

impl RowKind {
    /// Label of a summary row, `None` for analytes
    pub fn summary_label(&self) -> Option<&'static str> {
        match self {
            RowKind::Analyte => None,
            RowKind::Trace => Some("Trace"),
            RowKind::Balance => Some("Balance"),
            RowKind::Total => Some("Total"),
        }
    }

    /// Recognise a summary row label
    pub fn from_label(label: &str) -> RowKind {
        match label {
            "Trace" => RowKind::Trace,
            "Balance" => RowKind::Balance,
            "Total" => RowKind::Total,
            _ => RowKind::Analyte,
        }
    }
}

/// A table row: one analyte (or summary) across all sample columns
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// Atomic number of the (base) element, `None` for summary rows
    pub z: Option<u8>,
    /// Element symbol, oxide formula or summary label
    pub label: String,
    /// Analyte or summary
    pub kind: RowKind,
    /// One cell per sample column; `None` is a missing value
    pub values: Vec<Option<f64>>,
}

impl TableRow {
    /// Whether this row is an element or oxide
    pub fn is_analyte(&self) -> bool {
        self.kind == RowKind::Analyte
    }
}

/// The values of one sample column
#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumn {
    /// Column label (report abbreviation or sample ID)
    pub label: String,
    /// Instrument sample ID
    pub sample_id: String,
    /// `(analyte, value)` in row order
    pub values: Vec<(String, Option<f64>)>,
}

/// A concentration table in report layout: analytes are rows, samples are columns
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationTable {
    /// Which table this is
    pub kind: TableKind,
    /// Sample column labels
    pub columns: Vec<String>,
    /// Sample ID of each column
    pub sample_ids: Vec<String>,
    /// Analyte rows sorted by Z, followed by summary rows
    pub rows: Vec<TableRow>,
    /// Rounding applied to every cell
    pub rounding: Rounding,
}

impl ConcentrationTable {
    /// Table without rows
    pub fn new(kind: TableKind, columns: Vec<String>, sample_ids: Vec<String>, rounding: Rounding) -> Self {
        Self {
            kind,
            columns,
            sample_ids,
            rows: Vec::new(),
            rounding,
        }
    }

    /// Element and oxide rows
    pub fn analyte_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| r.is_analyte())
    }

    /// Trace, Balance and Total rows
    pub fn summary_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|r| !r.is_analyte())
    }

    /// Analyte labels in row order
    pub fn analytes(&self) -> Vec<&str> {
        self.analyte_rows().map(|r| r.label.as_str()).collect()
    }

    /// Whether the table has any analyte row
    pub fn has_analytes(&self) -> bool {
        self.analyte_rows().next().is_some()
    }

    /// Row by label
    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Index of a column, matched by label first and then by sample ID
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .or_else(|| self.sample_ids.iter().position(|s| s == column))
    }

    /// Cell value for a row label and a column label (or sample ID)
    pub fn value(&self, label: &str, column: &str) -> Option<f64> {
        let idx = self.column_index(column)?;
        self.row(label)?.values.get(idx).copied().flatten()
    }

    /// Per-column sum of the analyte rows; `None` where a column has no value
    pub fn column_sums(&self) -> Vec<Option<f64>> {
        (0..self.columns.len())
            .map(|idx| {
                self.analyte_rows()
                    .filter_map(|r| r.values.get(idx).copied().flatten())
                    .fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
            })
            .collect()
    }

    /// Per-column analyte sum expressed in weight percent
    pub fn weight_percent_sums(&self) -> Vec<Option<f64>> {
        let factor = self.kind.weight_percent_factor();
        self.column_sums()
            .into_iter()
            .map(|sum| sum.map(|s| s * factor))
            .collect()
    }

    /// Append the summary rows of this table kind.
    ///
    /// `trace_sums` holds the per-column trace total in wt.% and only applies
    /// to major tables. Existing summary rows are replaced.
    pub fn add_summary_rows(&mut self, trace_sums: Option<&[Option<f64>]>) {
        self.rows.retain(|r| r.is_analyte());
        let rounding = self.rounding;
        let sums = self.column_sums();
        let trace: Option<Vec<Option<f64>>> = match (self.kind.class, trace_sums) {
            (ElementClass::Major, Some(t)) => Some(
                (0..self.columns.len())
                    .map(|idx| t.get(idx).copied().flatten().map(|v| rounding.apply(v)))
                    .collect(),
            ),
            _ => None,
        };

        let round_all = |values: Vec<Option<f64>>| -> Vec<Option<f64>> {
            values.into_iter().map(|v| v.map(|x| rounding.apply(x))).collect()
        };

        match (self.kind.class, self.kind.basis) {
            (ElementClass::Major, Basis::Absolute) => {
                let mut with_trace = sums.clone();
                if let Some(trace) = &trace {
                    with_trace = combine(&sums, trace);
                    self.push_summary(RowKind::Trace, trace.clone());
                }
                let balance = with_trace.iter().map(|s| s.map(|s| 100.0 - s)).collect();
                let total = with_trace.iter().map(|s| s.map(|_| 100.0)).collect();
                self.push_summary(RowKind::Balance, round_all(balance));
                self.push_summary(RowKind::Total, total);
            }
            (ElementClass::Major, Basis::Relative) => {
                let mut total = sums.clone();
                if let Some(trace) = &trace {
                    total = combine(&sums, trace);
                    self.push_summary(RowKind::Trace, trace.clone());
                }
                self.push_summary(RowKind::Total, round_all(total));
            }
            (ElementClass::Trace, _) => {
                self.push_summary(RowKind::Total, round_all(sums));
            }
        }
    }

    fn push_summary(&mut self, kind: RowKind, values: Vec<Option<f64>>) {
        let label = kind.summary_label().unwrap_or_default().to_string();
        self.rows.push(TableRow {
            z: None,
            label,
            kind,
            values,
        });
    }

    /// Sample-major view: one entry per column with its analyte values
    pub fn by_sample(&self) -> Vec<SampleColumn> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, label)| SampleColumn {
                label: label.clone(),
                sample_id: self.sample_ids.get(idx).cloned().unwrap_or_else(|| label.clone()),
                values: self
                    .analyte_rows()
                    .map(|r| (r.label.clone(), r.values.get(idx).copied().flatten()))
                    .collect(),
            })
            .collect()
    }
}

/// Element-wise sum where either side may be missing
fn combine(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<Option<f64>> {
    a.iter()
        .zip(b)
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x + y),
            (Some(v), None) | (None, Some(v)) => Some(*v),
            (None, None) => None,
        })
        .collect()
}
