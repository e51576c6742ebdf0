use crate::metadata::ProjectMetadata;
use crate::tables::{Basis, ElementClass, TableKind};

/// Workbook name used when the project is unknown
pub const DEFAULT_WORKBOOK_NAME: &str = "XRF_Tables.xlsx";

/// Concatenated CSV name used when the project is unknown
pub const DEFAULT_CSV_NAME: &str = "XRF_concatenated.csv";

/// Worksheet name of a table, e.g. `Absolute Major Elements`
pub fn sheet_name(kind: TableKind) -> String {
    kind.title()
}

/// Caption written above a table.
///
/// `Table X. Absolute major element concentrations (wt.%) for 12345 Copper Ridge (Acme)`
pub fn caption(kind: TableKind, metadata: &ProjectMetadata) -> String {
    let basis = match kind.basis {
        Basis::Absolute => "Absolute",
        Basis::Relative => "Relative",
    };
    let unit = match kind.class {
        ElementClass::Major => "wt.%",
        ElementClass::Trace => "ppm",
    };

    let mut caption = format!("Table X. {} {} element concentrations", basis, kind.class);
    if kind.is_oxide() {
        caption.push_str(&format!(" reported as oxides ({})", unit));
    } else {
        caption.push_str(&format!(" ({})", unit));
    }

    let number = metadata.project_number.trim();
    let name = metadata.project_name.trim();
    match (number.is_empty(), name.is_empty()) {
        (false, false) => caption.push_str(&format!(" for {} {}", number, name)),
        (false, true) => caption.push_str(&format!(" for {}", number)),
        (true, false) => caption.push_str(&format!(" for {}", name)),
        (true, true) => {}
    }

    let client = metadata.client_name.trim();
    if !client.is_empty() {
        caption.push_str(&format!(" ({})", client));
    }
    caption
}

/// `<number>_<name>_XRF_Tables.xlsx`, or [`DEFAULT_WORKBOOK_NAME`]
pub fn default_workbook_name(metadata: &ProjectMetadata) -> String {
    match metadata.file_prefix() {
        Some(prefix) => format!("{}_XRF_Tables.xlsx", prefix),
        None => DEFAULT_WORKBOOK_NAME.to_string(),
    }
}

/// `<number>_<name>_XRF_concatenated.csv`, or [`DEFAULT_CSV_NAME`]
pub fn default_csv_name(metadata: &ProjectMetadata) -> String {
    match metadata.file_prefix() {
        Some(prefix) => format!("{}_XRF_concatenated.csv", prefix),
        None => DEFAULT_CSV_NAME.to_string(),
    }
}

/// File name of a single wide table CSV, e.g. `absolute_major_elements.csv`
pub fn table_csv_name(kind: TableKind) -> String {
    format!("{}.csv", kind.key())
}
