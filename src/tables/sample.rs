use crate::metadata::{LookupEntry, LookupTable};
use crate::qan::{Measurement, QanFile};

/// One sample ready for table derivation: its measurements plus lookup data
#[derive(Debug, Clone, PartialEq)]
pub struct SampleData {
    /// Lookup row (sample ID, notebook ID, client ID, report abbreviation)
    pub lookup: LookupEntry,
    /// Measurements in file order
    pub measurements: Vec<Measurement>,
}

impl SampleData {
    /// Sample without lookup data
    pub fn new(sample_id: impl Into<String>, measurements: Vec<Measurement>) -> Self {
        Self {
            lookup: LookupEntry::new(sample_id),
            measurements,
        }
    }

    /// Attach the lookup row of a parsed QAN file
    pub fn from_qan(qan: QanFile, lookup: &LookupTable) -> Self {
        Self {
            lookup: lookup.get(&qan.sample_id),
            measurements: qan.measurements,
        }
    }

    /// Instrument sample ID
    pub fn sample_id(&self) -> &str {
        &self.lookup.sample_id
    }

    /// Report column label (report abbreviation, else sample ID)
    pub fn column_label(&self) -> &str {
        self.lookup.column_label()
    }
}
