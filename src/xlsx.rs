//! Workbook file I/O.
//!
//! Writes [`Workbook`] sheets with `rust_xlsxwriter` and reads `.xlsx` /
//! `.xls` files back with `calamine`. Read cells are kept as text, like the
//! string-typed frames the codec expects.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader};
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use tracing::{debug, info};

use crate::codec::{Sheet, Workbook};
use crate::error::{CarbonError, Result};
use crate::schema::{column, file};

// ── Writing ─────────────────────────────────────────────────────────────────

fn build(workbook: &Workbook) -> Result<XlsxWorkbook> {
    let mut book = XlsxWorkbook::new();
    let header = Format::new().set_bold();

    for sheet in workbook.sheets() {
        let ws = book.add_worksheet();
        ws.set_name(&sheet.name)?;
        write_sheet(ws, sheet, &header)?;
    }
    Ok(book)
}

fn write_sheet(ws: &mut Worksheet, sheet: &Sheet, header: &Format) -> Result<()> {
    let df = &sheet.frame;

    for (col_idx, col) in df.get_columns().iter().enumerate() {
        let c = col_idx as u16;
        let name = col.name().as_str();
        ws.write_string_with_format(0, c, name, header)?;
        let mut width = name.chars().count();

        let numeric = column::NUMERIC.contains(&name);
        let text = col.cast(&DataType::String)?;
        for (row_idx, cell) in text.str()?.into_iter().enumerate() {
            let Some(cell) = cell.filter(|s| !s.is_empty()) else {
                continue;
            };
            let r = row_idx as u32 + 1;
            match cell.parse::<f64>() {
                Ok(value) if numeric => {
                    ws.write_number(r, c, value)?;
                    width = width.max(format_number(value).chars().count());
                }
                _ => {
                    ws.write_string(r, c, cell)?;
                    width = width.max(cell.chars().count());
                }
            }
        }
        ws.set_column_width(c, (width + 2) as f64)?;
    }
    Ok(())
}

fn format_number(value: f64) -> String {
    let s = value.to_string();
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}

/// Serialise a workbook to `.xlsx` bytes.
pub fn workbook_to_bytes(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut book = build(workbook)?;
    Ok(book.save_to_buffer()?)
}

/// Write a workbook to an `.xlsx` file.
pub fn write_workbook(workbook: &Workbook, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut book = build(workbook)?;
    book.save(path)?;
    info!(path = %path.display(), sheets = workbook.sheets().len(), "workbook written");
    Ok(())
}

/// `bilan_carbone_<label>.xlsx`, with whitespace turned into `_` and
/// characters that cannot appear in a file name removed.
pub fn export_file_name(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();
    let label = if cleaned.is_empty() {
        file::DEFAULT_LABEL
    } else {
        cleaned.as_str()
    };
    format!("{}_{label}.xlsx", file::EXPORT_PREFIX)
}

// ── Reading ─────────────────────────────────────────────────────────────────

/// Read every sheet of an `.xlsx` / `.xls` file.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<Workbook> {
    let path = path.as_ref();
    let mut book = open_workbook_auto(path)?;
    let names = book.sheet_names();

    let mut workbook = Workbook::new();
    for name in names {
        let range = book.worksheet_range(&name)?;
        workbook.add_sheet(name, range_to_frame(&range)?);
    }
    info!(path = %path.display(), sheets = workbook.sheets().len(), "workbook read");
    Ok(workbook)
}

/// Read every sheet of an in-memory `.xlsx` / `.xls` file.
pub fn read_workbook_from_bytes(bytes: &[u8]) -> Result<Workbook> {
    let mut book = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names = book.sheet_names();

    let mut workbook = Workbook::new();
    for name in names {
        let range = book.worksheet_range(&name)?;
        workbook.add_sheet(name, range_to_frame(&range)?);
    }
    Ok(workbook)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Turn a sheet range into a frame of string columns named by the trimmed
/// header row. Blank rows are dropped; a repeated header keeps its last
/// column; columns with a blank header are ignored.
fn range_to_frame(range: &Range<Data>) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();
    for (idx, cell) in header.iter().enumerate() {
        let Some(name) = cell_text(cell).map(|s| s.trim().to_string()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if positions.insert(name.clone(), idx).is_some() {
            debug!(header = %name, "repeated header, keeping last column");
        } else {
            order.push(name);
        }
    }

    let body: Vec<Vec<Option<String>>> = rows
        .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| c.as_deref().is_some_and(|s| !s.trim().is_empty())))
        .collect();

    let columns = order
        .iter()
        .map(|name| {
            let idx = positions[name];
            let values: Vec<Option<String>> = body
                .iter()
                .map(|row| row.get(idx).cloned().flatten())
                .collect();
            Column::new(name.as_str().into(), &values)
        })
        .collect::<Vec<_>>();

    DataFrame::new(columns).map_err(CarbonError::from)
}
