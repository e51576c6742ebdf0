use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use super::MetadataError;

/// File name of the lookup table inside an XRF folder
pub const LOOKUP_FILE_NAME: &str = "sample_lookup.csv";

/// Column order of the lookup CSV
pub const LOOKUP_COLUMNS: [&str; 4] = ["sample_id", "notebook_id", "client_id", "report_abbreviation"];

/// One row of the sample lookup table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupEntry {
    /// Instrument sample ID (unique)
    pub sample_id: String,
    /// Laboratory notebook ID
    pub notebook_id: String,
    /// Client-supplied sample ID
    pub client_id: String,
    /// Short label used as the sample's column header in reports
    pub report_abbreviation: String,
}

impl LookupEntry {
    /// Blank entry for a sample
    pub fn new(sample_id: impl Into<String>) -> Self {
        Self {
            sample_id: sample_id.into(),
            ..Default::default()
        }
    }

    /// Report column label: the abbreviation, or the sample ID when none is set
    pub fn column_label(&self) -> &str {
        if self.report_abbreviation.trim().is_empty() {
            &self.sample_id
        } else {
            &self.report_abbreviation
        }
    }
}

/// Sample ID → notebook / client / report abbreviation mapping.
///
/// Rows keep insertion order and sample IDs are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupTable {
    entries: Vec<LookupEntry>,
}

impl LookupTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank rows for the given sample IDs (duplicates collapse to one row)
    pub fn from_sample_ids<I, S>(sample_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for id in sample_ids {
            let id = id.into();
            if table.contains(&id) {
                continue;
            }
            table.entries.push(LookupEntry::new(id));
        }
        table
    }

    /// Build a table from entries, rejecting duplicate sample IDs
    pub fn from_entries(entries: Vec<LookupEntry>) -> Result<Self, MetadataError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.sample_id.as_str()) {
                return Err(MetadataError::DuplicateSample(entry.sample_id.clone()));
            }
        }
        Ok(Self { entries })
    }

    /// Load `sample_lookup.csv` from an XRF folder; a missing file gives an empty table
    pub fn load<P: AsRef<Path>>(xrf_folder: P) -> Result<Self, MetadataError> {
        let path = xrf_folder.as_ref().join(LOOKUP_FILE_NAME);
        if !path.exists() {
            debug!("No {} found, starting with an empty lookup table", path.display());
            return Ok(Self::new());
        }
        Self::from_reader(File::open(path)?)
    }

    /// Parse lookup CSV data
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, MetadataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let has_sample_column = csv_reader.headers()?.iter().any(|h| h == "sample_id");
        if !has_sample_column {
            return Err(MetadataError::MissingColumn("sample_id".to_string()));
        }

        let mut entries = Vec::new();
        for row in csv_reader.deserialize() {
            let entry: LookupEntry = row?;
            if !entry.sample_id.is_empty() {
                entries.push(entry);
            }
        }

        Self::from_entries(entries)
    }

    /// Write `sample_lookup.csv` into an XRF folder
    pub fn save<P: AsRef<Path>>(&self, xrf_folder: P) -> Result<(), MetadataError> {
        let path = xrf_folder.as_ref().join(LOOKUP_FILE_NAME);
        self.to_writer(File::create(&path)?)?;
        debug!("Saved {} lookup rows to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Write lookup CSV data (header always present)
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), MetadataError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(LOOKUP_COLUMNS)?;
        for entry in &self.entries {
            csv_writer.serialize(entry)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Rows for `sample_ids` in that order: existing rows are kept, new IDs get blank rows.
    ///
    /// Rows for samples not in `sample_ids` are dropped.
    pub fn merge<I, S>(&self, sample_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut merged = Self::new();
        for id in sample_ids {
            let id = id.as_ref();
            if merged.contains(id) {
                continue;
            }
            let entry = self
                .entries
                .iter()
                .find(|e| e.sample_id == id)
                .cloned()
                .unwrap_or_else(|| LookupEntry::new(id));
            merged.entries.push(entry);
        }
        merged
    }

    /// Lookup data for a sample (a blank entry when the sample is unknown)
    pub fn get(&self, sample_id: &str) -> LookupEntry {
        self.find(sample_id)
            .cloned()
            .unwrap_or_else(|| LookupEntry::new(sample_id))
    }

    /// Row for a sample ID, if present
    pub fn find(&self, sample_id: &str) -> Option<&LookupEntry> {
        self.entries.iter().find(|e| e.sample_id == sample_id)
    }

    /// Row whose report abbreviation or sample ID equals a report column label
    pub fn find_by_label(&self, label: &str) -> Option<&LookupEntry> {
        self.entries
            .iter()
            .find(|e| e.report_abbreviation == label || e.sample_id == label)
    }

    /// Replace the row for `entry.sample_id`, or append it
    pub fn upsert(&mut self, entry: LookupEntry) {
        match self.entries.iter_mut().find(|e| e.sample_id == entry.sample_id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Mutable row for a sample ID
    pub fn get_mut(&mut self, sample_id: &str) -> Result<&mut LookupEntry, MetadataError> {
        self.entries
            .iter_mut()
            .find(|e| e.sample_id == sample_id)
            .ok_or_else(|| MetadataError::UnknownSample(sample_id.to_string()))
    }

    /// Set one field (`notebook_id`, `client_id` or `report_abbreviation`)
    /// of an existing row
    pub fn set(&mut self, sample_id: &str, field: &str, value: &str) -> Result<(), MetadataError> {
        let entry = self.get_mut(sample_id)?;
        let slot = match field {
            "notebook_id" => &mut entry.notebook_id,
            "client_id" => &mut entry.client_id,
            "report_abbreviation" => &mut entry.report_abbreviation,
            other => return Err(MetadataError::UnknownField(other.to_string())),
        };
        *slot = value.to_string();
        Ok(())
    }

    /// Whether the table has a row for a sample ID
    pub fn contains(&self, sample_id: &str) -> bool {
        self.find(sample_id).is_some()
    }

    /// All rows in order
    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Report abbreviations used by more than one sample
    pub fn duplicate_abbreviations(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            let abbr = entry.report_abbreviation.trim();
            if abbr.is_empty() {
                continue;
            }
            if !seen.insert(abbr) && !duplicates.iter().any(|d: &String| d == abbr) {
                duplicates.push(abbr.to_string());
            }
        }
        duplicates
    }
}
