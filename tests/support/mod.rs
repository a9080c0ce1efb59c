#![allow(dead_code)]

use rust_xlsxwriter::Workbook;

/// One raw export line: (agent name on the first line of a block, state,
/// occurrences, total time).
pub type RawLine<'a> = (Option<&'a str>, Option<&'a str>, Option<f64>, &'a str);

/// Build a raw export the way the platform lays it out: blank header row,
/// agent name at column 0, state at 1, filler at 2/3/5, occurrences at 4,
/// total time at 6.
pub fn raw_workbook(lines: &[RawLine]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (i, (name, state, occurrences, total)) in lines.iter().enumerate() {
        let row = i as u32 + 1;
        if let Some(name) = name {
            sheet.write_string(row, 0, *name).unwrap();
        }
        if let Some(state) = state {
            sheet.write_string(row, 1, *state).unwrap();
        }
        sheet.write_string(row, 2, "12%").unwrap();
        sheet.write_string(row, 3, "-").unwrap();
        if let Some(occ) = occurrences {
            sheet.write_number(row, 4, *occ).unwrap();
        }
        sheet.write_string(row, 5, "-").unwrap();
        sheet.write_string(row, 6, *total).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

/// Text of every cell in the named column.
pub fn column_text(table: &wfm_cleaner::Table, name: &str) -> Vec<String> {
    let idx = table
        .column_index(name)
        .unwrap_or_else(|| panic!("missing column {name}"));
    table.column_values(idx).map(|c| c.to_string()).collect()
}
