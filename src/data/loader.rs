use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{Data, ExcelDateTime, Ods, Range, Reader, Xls, Xlsb, Xlsx};

use super::model::{CellValue, Column, Table, UNNAMED_PREFIX};
use super::time::format_seconds;
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the first worksheet of an uploaded workbook. Dispatch by extension.
///
/// Supported formats:
/// * `.xls`            – legacy BIFF workbook
/// * `.xlsx` / `.xlsm` – Office Open XML workbook
/// * `.xlsb`           – binary Office workbook
/// * `.ods`            – OpenDocument spreadsheet
///
/// Row 0 is the header row. Blank header cells get the placeholder label
/// `Unnamed: <position>`. No schema validation happens here.
pub fn load_bytes(bytes: &[u8], filename: &str) -> Result<Table> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let cursor = Cursor::new(bytes);
    let table = match ext.as_str() {
        "xls" => read_first_sheet::<_, Xls<Cursor<&[u8]>>>(cursor),
        "xlsx" | "xlsm" => read_first_sheet::<_, Xlsx<Cursor<&[u8]>>>(cursor),
        "xlsb" => read_first_sheet::<_, Xlsb<Cursor<&[u8]>>>(cursor),
        "ods" => read_first_sheet::<_, Ods<Cursor<&[u8]>>>(cursor),
        other => Err(PipelineError::Format(format!(
            "unsupported file extension: .{other}"
        ))),
    }?;

    log::debug!(
        "Loaded {filename}: {} rows x {} columns",
        table.len(),
        table.columns.len()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Workbook → Table
// ---------------------------------------------------------------------------

fn read_first_sheet<RS, R>(source: RS) -> Result<Table>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let mut workbook =
        R::new(source).map_err(|e| PipelineError::Format(format!("cannot open workbook: {e}")))?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.len() > 1 {
        log::warn!(
            "Workbook has {} sheets; only '{}' is read",
            sheet_names.len(),
            sheet_names[0]
        );
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::Format("workbook contains no worksheet".into()))?
        .map_err(|e| PipelineError::Format(format!("cannot read worksheet: {e}")))?;

    Ok(range_to_table(&range))
}

/// Lay the used range out at absolute sheet coordinates, so a blank leading
/// column still occupies position 0.
fn range_to_table(range: &Range<Data>) -> Table {
    let Some((row0, col0)) = range.start() else {
        return Table::default();
    };
    let (row0, col0) = (row0 as usize, col0 as usize);
    let (height, width) = range.get_size();
    let n_rows = row0 + height;
    let n_cols = col0 + width;

    let mut grid = vec![vec![CellValue::Null; n_cols]; n_rows];
    for (i, row) in range.rows().enumerate() {
        for (j, data) in row.iter().enumerate() {
            grid[row0 + i][col0 + j] = cell_from_data(data);
        }
    }

    let mut rows = grid.into_iter();
    let header = rows.next().unwrap_or_else(|| vec![CellValue::Null; n_cols]);
    let mut table = Table::new(header_columns(&header));
    for row in rows {
        table.push_row(row);
    }
    table
}

/// Header labels with placeholders for blanks and `.N` suffixes for repeats.
fn header_columns(header: &[CellValue]) -> Vec<Column> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(pos, cell)| {
            let base = match cell {
                CellValue::Null => format!("{UNNAMED_PREFIX}{pos}"),
                other => other.to_string(),
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            Column::sourced(name, pos)
        })
        .collect()
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) if s.is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Null,
        Data::DateTime(dt) => datetime_cell(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Date(s.clone()),
    }
}

/// Durations (`[h]:mm:ss`, any length) and time-of-day serials (below one
/// day) become `HH:MM:SS` text so they flow through the same path as textual
/// durations. Hours are not wrapped.
fn datetime_cell(dt: &ExcelDateTime) -> CellValue {
    let serial = dt.as_f64();
    if dt.is_duration() || (0.0..1.0).contains(&serial) {
        return CellValue::String(format_seconds(Some(serial * 86_400.0)));
    }
    match dt.as_datetime() {
        Some(ndt) => CellValue::Date(ndt.to_string()),
        None => CellValue::Date(serial.to_string()),
    }
}
