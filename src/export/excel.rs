//! Excel workbook export.
//!
//! Sheet layout: `Metadata`, `Lookup Table`, then one sheet per generated
//! table. Every sheet starts with a caption row followed by a blank row.

use log::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

use super::naming::{caption, sheet_name};
use super::ExportError;
use crate::metadata::{LookupTable, ProjectMetadata, LOOKUP_COLUMNS};
use crate::tables::{ConcentrationTable, GeneratedTables, RowKind};

/// Row of the table header (after caption and blank row)
const HEADER_ROW: u32 = 2;

/// Cell formats shared by all sheets
struct Styles {
    caption: Format,
    header: Format,
    key: Format,
    text: Format,
    cell: Format,
    cell_above_total: Format,
}

impl Styles {
    fn new() -> Self {
        let base = Format::new().set_font_name("Arial").set_font_size(10);
        let cell = base
            .clone()
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);
        Self {
            caption: Format::new()
                .set_font_name("Arial")
                .set_font_size(12)
                .set_bold()
                .set_align(FormatAlign::Left),
            header: cell
                .clone()
                .set_bold()
                .set_background_color(Color::RGB(0xD3D3D3)),
            key: base
                .clone()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Left),
            text: base
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Left),
            cell_above_total: cell.clone().set_border_bottom(FormatBorder::Double),
            cell,
        }
    }
}

fn number_format(decimals: usize) -> String {
    if decimals == 0 {
        "0".to_string()
    } else {
        format!("0.{}", "0".repeat(decimals))
    }
}

fn write_metadata_sheet(
    worksheet: &mut Worksheet,
    metadata: &ProjectMetadata,
    styles: &Styles,
) -> Result<(), ExportError> {
    worksheet.set_name("Metadata")?;
    worksheet.write_string_with_format(0, 0, "Project Metadata", &styles.caption)?;

    for (idx, (key, value)) in metadata.fields().iter().enumerate() {
        let row = HEADER_ROW + idx as u32;
        worksheet.write_string_with_format(row, 0, *key, &styles.key)?;
        worksheet.write_string_with_format(row, 1, *value, &styles.text)?;
    }
    worksheet.autofit();
    Ok(())
}

fn write_lookup_sheet(
    worksheet: &mut Worksheet,
    lookup: &LookupTable,
    styles: &Styles,
) -> Result<(), ExportError> {
    worksheet.set_name("Lookup Table")?;
    worksheet.write_string_with_format(0, 0, "Sample Lookup Table", &styles.caption)?;

    for (col, name) in LOOKUP_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, col as u16, *name, &styles.header)?;
    }
    for (idx, entry) in lookup.entries().iter().enumerate() {
        let row = HEADER_ROW + 1 + idx as u32;
        let cells = [
            &entry.sample_id,
            &entry.notebook_id,
            &entry.client_id,
            &entry.report_abbreviation,
        ];
        for (col, value) in cells.iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, value.as_str(), &styles.cell)?;
        }
    }
    worksheet.autofit();
    Ok(())
}

fn write_table_sheet(
    worksheet: &mut Worksheet,
    table: &ConcentrationTable,
    metadata: &ProjectMetadata,
    missing_data: &str,
    styles: &Styles,
) -> Result<(), ExportError> {
    worksheet.set_name(sheet_name(table.kind))?;
    worksheet.write_string_with_format(0, 0, caption(table.kind, metadata), &styles.caption)?;

    worksheet.write_string_with_format(HEADER_ROW, 0, "Z", &styles.header)?;
    worksheet.write_string_with_format(HEADER_ROW, 1, "Element", &styles.header)?;
    for (idx, column) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(HEADER_ROW, 2 + idx as u16, column, &styles.header)?;
    }

    let num_format = number_format(table.rounding.decimals());
    let value_style = styles.cell.clone().set_num_format(&num_format);
    let value_above_total = styles.cell_above_total.clone().set_num_format(&num_format);

    for (idx, row) in table.rows.iter().enumerate() {
        let sheet_row = HEADER_ROW + 1 + idx as u32;
        let above_total = table
            .rows
            .get(idx + 1)
            .map_or(false, |next| next.kind == RowKind::Total);
        let (text_style, number_style) = if above_total {
            (&styles.cell_above_total, &value_above_total)
        } else {
            (&styles.cell, &value_style)
        };

        match row.z {
            Some(z) => worksheet.write_number_with_format(sheet_row, 0, z as f64, text_style)?,
            None => worksheet.write_blank(sheet_row, 0, text_style)?,
        };
        worksheet.write_string_with_format(sheet_row, 1, &row.label, text_style)?;

        for (col, value) in row.values.iter().enumerate() {
            let col = 2 + col as u16;
            match value {
                Some(v) => worksheet.write_number_with_format(sheet_row, col, *v, number_style)?,
                None => worksheet.write_string_with_format(sheet_row, col, missing_data, text_style)?,
            };
        }
    }
    worksheet.autofit();
    Ok(())
}

/// Build the report workbook in memory
pub fn build_workbook(
    tables: &GeneratedTables,
    metadata: &ProjectMetadata,
    lookup: &LookupTable,
    missing_data: &str,
) -> Result<Workbook, ExportError> {
    if tables.is_empty() {
        return Err(ExportError::Empty("no tables were generated".to_string()));
    }

    let styles = Styles::new();
    let mut workbook = Workbook::new();
    write_metadata_sheet(workbook.add_worksheet(), metadata, &styles)?;
    write_lookup_sheet(workbook.add_worksheet(), lookup, &styles)?;
    for table in tables.iter() {
        write_table_sheet(workbook.add_worksheet(), table, metadata, missing_data, &styles)?;
    }
    Ok(workbook)
}

/// Write the report workbook to an `.xlsx` file
pub fn write_workbook<P: AsRef<Path>>(
    path: P,
    tables: &GeneratedTables,
    metadata: &ProjectMetadata,
    lookup: &LookupTable,
    missing_data: &str,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let mut workbook = build_workbook(tables, metadata, lookup, missing_data)?;
    workbook.save(path)?;
    info!("Saved {} table sheet(s) to {}", tables.len(), path.display());
    Ok(())
}
