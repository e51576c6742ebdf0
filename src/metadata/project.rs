use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use super::MetadataError;

/// File name of the project metadata inside an XRF folder
pub const METADATA_FILE_NAME: &str = "metadata.json";

/// Sample type for which absolute concentrations are meaningful
pub const STANDARD_PELLET: &str = "standard pellet";

/// Project-level information attached to every generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectMetadata {
    /// Analysis date (YYYY-MM-DD)
    pub date: String,
    /// Project number (e.g. "12345")
    pub project_number: String,
    /// Project name
    pub project_name: String,
    /// Client name
    pub client_name: String,
    /// Instrument operator
    pub operator: String,
    /// Instrument name, matching an entry of the settings file
    pub instrument: String,
    /// Sample preparation type (e.g. "standard pellet")
    pub sample_type: String,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            date: chrono::Local::now().format("%Y-%m-%d").to_string(),
            project_number: String::new(),
            project_name: String::new(),
            client_name: String::new(),
            operator: String::new(),
            instrument: String::new(),
            sample_type: STANDARD_PELLET.to_string(),
        }
    }
}

/// Project information recovered from a folder path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathProjectInfo {
    /// Client folder name
    pub client_name: String,
    /// Leading digits of the project folder
    pub project_number: String,
    /// Remainder of the project folder after the underscore
    pub project_name: String,
}

/// Extract client and project from an XRF folder path.
///
/// Expected layout: `.../<Client>/Projects/<number>_<name>/Data/XRF`. Fields
/// that cannot be recovered are left empty.
pub fn extract_project_info_from_path<P: AsRef<Path>>(xrf_folder: P) -> PathProjectInfo {
    let parts: Vec<String> = xrf_folder
        .as_ref()
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    let mut info = PathProjectInfo::default();
    let Some(xrf_index) = parts.iter().position(|p| p.eq_ignore_ascii_case("xrf")) else {
        return info;
    };

    if xrf_index >= 2 {
        let project_folder = &parts[xrf_index - 2];
        let (number, name) = match project_folder.split_once('_') {
            Some((number, name)) => (number, name),
            None => (project_folder.as_str(), ""),
        };
        if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
            info.project_number = number.to_string();
            info.project_name = name.to_string();
        }
    }

    if xrf_index >= 4 {
        info.client_name = parts[xrf_index - 4].clone();
    }

    info
}

impl ProjectMetadata {
    /// Default metadata completed with whatever the folder path reveals
    pub fn from_path<P: AsRef<Path>>(xrf_folder: P) -> Self {
        let info = extract_project_info_from_path(xrf_folder);
        Self {
            project_number: info.project_number,
            project_name: info.project_name,
            client_name: info.client_name,
            ..Default::default()
        }
    }

    /// Load `metadata.json` from an XRF folder.
    ///
    /// A missing file yields defaults derived from the folder path. An
    /// unreadable file is logged and also falls back to those defaults.
    pub fn load<P: AsRef<Path>>(xrf_folder: P) -> Self {
        let folder = xrf_folder.as_ref();
        let path = folder.join(METADATA_FILE_NAME);
        if !path.exists() {
            debug!("No {} in {}, using defaults", METADATA_FILE_NAME, folder.display());
            return Self::from_path(folder);
        }

        match Self::from_file(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Ignoring unreadable {}: {}", path.display(), e);
                Self::from_path(folder)
            }
        }
    }

    /// Read metadata from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MetadataError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Write `metadata.json` into an XRF folder
    pub fn save<P: AsRef<Path>>(&self, xrf_folder: P) -> Result<(), MetadataError> {
        let path = xrf_folder.as_ref().join(METADATA_FILE_NAME);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        debug!("Saved metadata to {}", path.display());
        Ok(())
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, MetadataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Names of required fields that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("project_number", &self.project_number),
            ("client_name", &self.client_name),
            ("operator", &self.operator),
            ("instrument", &self.instrument),
            ("sample_type", &self.sample_type),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Whether absolute concentrations can be reported for this sample type
    pub fn supports_absolute(&self) -> bool {
        self.sample_type.trim().eq_ignore_ascii_case(STANDARD_PELLET)
    }

    /// Field name / value pairs in display order
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("date", self.date.as_str()),
            ("project_number", self.project_number.as_str()),
            ("project_name", self.project_name.as_str()),
            ("client_name", self.client_name.as_str()),
            ("operator", self.operator.as_str()),
            ("instrument", self.instrument.as_str()),
            ("sample_type", self.sample_type.as_str()),
        ]
    }

    /// File name prefix `<number>_<name>` when both are known
    pub fn file_prefix(&self) -> Option<String> {
        if self.project_number.is_empty() || self.project_name.is_empty() {
            None
        } else {
            Some(format!("{}_{}", self.project_number, self.project_name))
        }
    }
}
