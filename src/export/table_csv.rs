use log::info;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::ExportError;
use super::naming::table_csv_name;
use crate::chemistry::analyte_z;
use crate::tables::{ConcentrationTable, GeneratedTables, Rounding, RowKind, TableKind, TableRow};

/// Format a cell with the precision of its table
pub fn format_value(value: Option<f64>, rounding: Rounding, missing_data: &str) -> String {
    match value {
        Some(v) => format!("{:.*}", rounding.decimals(), v),
        None => missing_data.to_string(),
    }
}

/// Write a table in report layout: `Z, Element, <samples...>`
pub fn write_table_csv<W: Write>(
    table: &ConcentrationTable,
    writer: W,
    missing_data: &str,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Z".to_string(), "Element".to_string()];
    header.extend(table.columns.iter().cloned());
    csv_writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(table.columns.len() + 2);
        record.push(row.z.map(|z| z.to_string()).unwrap_or_default());
        record.push(row.label.clone());
        for value in &row.values {
            record.push(format_value(*value, table.rounding, missing_data));
        }
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a table written by [`write_table_csv`].
///
/// Cells that are not numbers (the missing-data placeholder) read back as
/// missing. Sample IDs are taken from the column labels.
pub fn read_table_csv<R: Read>(
    reader: R,
    kind: TableKind,
    rounding: Rounding,
) -> Result<ConcentrationTable, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    if headers.get(0) != Some("Z") {
        return Err(ExportError::MissingColumn("Z".to_string()));
    }
    if headers.get(1) != Some("Element") {
        return Err(ExportError::MissingColumn("Element".to_string()));
    }
    let columns: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();

    let mut table = ConcentrationTable::new(kind, columns.clone(), columns, rounding);
    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result?;
        let label = record.get(1).unwrap_or("").to_string();
        let row_kind = RowKind::from_label(&label);
        let z = match record.get(0).unwrap_or("") {
            "" if row_kind == RowKind::Analyte => Some(analyte_z(&label)),
            "" => None,
            text => Some(text.parse::<u8>().map_err(|_| ExportError::InvalidValue {
                row: row_idx + 1,
                value: text.to_string(),
            })?),
        };
        let values = (0..table.columns.len())
            .map(|idx| {
                record
                    .get(idx + 2)
                    .and_then(|cell| cell.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect();

        table.rows.push(TableRow {
            z,
            label,
            kind: row_kind,
            values,
        });
    }
    Ok(table)
}

/// Write every generated table to `<dir>/<table key>.csv`
pub fn save_table_csvs<P: AsRef<Path>>(
    tables: &GeneratedTables,
    dir: P,
    missing_data: &str,
) -> Result<Vec<PathBuf>, ExportError> {
    let dir = dir.as_ref();
    let mut written = Vec::new();
    for table in tables.iter() {
        let path = dir.join(table_csv_name(table.kind));
        write_table_csv(table, File::create(&path)?, missing_data)?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
