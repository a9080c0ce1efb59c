use std::io::Write;

use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet, XlsxError};

use super::model::{CellValue, Table};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Column width heuristic
// ---------------------------------------------------------------------------

const WIDTH_SAMPLE_ROWS: usize = 200;
const WIDTH_PADDING: usize = 4;
const MIN_WIDTH: usize = 12;
const MAX_WIDTH: usize = 45;

/// `max(header length, mean text length of the first 200 cells) + 4`,
/// clamped to `[12, 45]`. Lengths count characters, not bytes.
///
/// Cells are measured by their `Display` text: nulls count as 0 and whole
/// floats print without a fraction (`4`, not `4.0`). This can differ by a
/// few characters from a pandas-style `str()` rendering; keep it that way so
/// widths match what `write_csv` and previews show.
pub fn column_width(table: &Table, idx: usize) -> usize {
    let header = table.columns[idx].name.chars().count();
    let lengths: Vec<usize> = table
        .column_values(idx)
        .take(WIDTH_SAMPLE_ROWS)
        .map(|cell| cell.to_string().chars().count())
        .collect();
    let mean = if lengths.is_empty() {
        header
    } else {
        lengths.iter().sum::<usize>() / lengths.len()
    };
    (header.max(mean) + WIDTH_PADDING).clamp(MIN_WIDTH, MAX_WIDTH)
}

// ---------------------------------------------------------------------------
// xlsx
// ---------------------------------------------------------------------------

/// Serialize a table as a single-sheet xlsx workbook: header row frozen,
/// column widths from [`column_width`], no other styling.
pub fn write_xlsx(table: &Table, sheet_label: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_label)?;

    for (col, column) in table.columns.iter().enumerate() {
        let col_num = col as ColNum;
        sheet.write_string(0, col_num, column.name.as_str())?;
        sheet.set_column_width(col_num, column_width(table, col) as f64)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as RowNum;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, row_num, col as ColNum, cell)?;
        }
    }

    sheet.set_freeze_panes(1, 0)?;

    let bytes = workbook.save_to_buffer()?;
    log::debug!(
        "Wrote sheet '{sheet_label}': {} rows, {} bytes",
        table.len(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_cell(
    sheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    cell: &CellValue,
) -> std::result::Result<(), XlsxError> {
    match cell {
        CellValue::Null => {}
        CellValue::String(s) | CellValue::Date(s) => {
            sheet.write_string(row, col, s.as_str())?;
        }
        CellValue::Integer(i) => {
            sheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(v) if v.is_finite() => {
            sheet.write_number(row, col, *v)?;
        }
        CellValue::Float(v) => {
            sheet.write_string(row, col, v.to_string())?;
        }
        CellValue::Bool(b) => {
            sheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV preview
// ---------------------------------------------------------------------------

/// Write the header and at most `limit` rows as CSV.
pub fn write_csv<W: Write>(table: &Table, out: W, limit: Option<usize>) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(table.column_names())
        .map_err(std::io::Error::from)?;
    for row in table.rows.iter().take(limit.unwrap_or(usize::MAX)) {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .map_err(std::io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::error::PipelineError;

    #[test]
    fn width_is_clamped() {
        let t = Table::from_rows(&["id"], vec![vec!["1".into()]]);
        assert_eq!(column_width(&t, 0), 12);

        let long = "x".repeat(80);
        let t = Table::from_rows(&["note"], vec![vec![long.as_str().into()]]);
        assert_eq!(column_width(&t, 0), 45);
    }

    #[test]
    fn width_uses_mean_sample_length() {
        let t = Table::from_rows(
            &["Etat"],
            vec![
                vec!["Aucun contexte démarré".into()],
                vec!["Numérotation".into()],
            ],
        );
        // (22 + 12) / 2 = 17, + 4
        assert_eq!(column_width(&t, 0), 21);
    }

    #[test]
    fn width_of_empty_table_uses_header() {
        let t = Table::from_rows(&["Moy Temps Total (sec)"], vec![]);
        assert_eq!(column_width(&t, 0), 25);
    }

    #[test]
    fn workbook_reads_back() {
        let t = Table::from_rows(
            &["Etat", "Occurances", "Moy Temps Total"],
            vec![
                vec!["Meeting".into(), 4.0.into(), "00:00:30".into()],
                vec!["OJT".into(), CellValue::Null, "00:01:00".into()],
            ],
        );
        let bytes = write_xlsx(&t, "rapport_final").unwrap();
        let back = load_bytes(&bytes, "rapport_final.xlsx").unwrap();
        assert_eq!(back.column_names(), t.column_names());
        assert_eq!(back.rows[0][0], CellValue::from("Meeting"));
        assert_eq!(back.rows[0][1].as_f64(), Some(4.0));
        assert_eq!(back.rows[1][1], CellValue::Null);
        assert_eq!(back.rows[1][2], CellValue::from("00:01:00"));
    }

    #[test]
    fn invalid_sheet_label_is_a_write_error() {
        let t = Table::from_rows(&["a"], vec![]);
        assert!(matches!(
            write_xlsx(&t, "bad[label]"),
            Err(PipelineError::Write(_))
        ));
    }

    #[test]
    fn csv_preview_respects_limit() {
        let t = Table::from_rows(
            &["Etat", "Occurances"],
            vec![
                vec!["Meeting".into(), 4.0.into()],
                vec!["OJT".into(), CellValue::Null],
            ],
        );
        let mut out = Vec::new();
        write_csv(&t, &mut out, Some(1)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Etat,Occurances\nMeeting,4\n");
    }
}
