use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, keeping the type the source workbook gave it.
/// Using `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Date or date-time, kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{d}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(CellValue::Null, Into::into)
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Borrow the text of a `String` cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – header label plus where it came from
// ---------------------------------------------------------------------------

/// Placeholder label given to columns whose source header cell is blank.
pub const UNNAMED_PREFIX: &str = "Unnamed: ";

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Zero-based position in the source sheet; `None` for derived columns.
    pub position: Option<usize>,
}

impl Column {
    pub fn derived(name: impl Into<String>) -> Self {
        Column {
            name: name.into(),
            position: None,
        }
    }

    pub fn sourced(name: impl Into<String>, position: usize) -> Self {
        Column {
            name: name.into(),
            position: Some(position),
        }
    }

    /// Whether the source sheet left this column's header blank.
    pub fn is_unlabeled(&self) -> bool {
        self.name.starts_with(UNNAMED_PREFIX)
    }
}

// ---------------------------------------------------------------------------
// Table – rows of cells under named columns
// ---------------------------------------------------------------------------

/// A rectangular, row-major table. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table of derived columns from plain headers. Short rows are
    /// padded with nulls.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        let mut table = Table::new(headers.iter().map(|h| Column::derived(*h)).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, mut row: Vec<CellValue>) {
        row.resize(self.columns.len(), CellValue::Null);
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of the column that sat at `position` in the source sheet.
    pub fn position_index(&self, position: usize) -> Option<usize> {
        self.columns.iter().position(|c| c.position == Some(position))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate over one column's cells, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Sorted set of distinct values in a column.
    pub fn distinct(&self, name: &str) -> BTreeSet<CellValue> {
        match self.column_index(name) {
            Some(idx) => self.column_values(idx).cloned().collect(),
            None => BTreeSet::new(),
        }
    }

    pub fn rename_column(&mut self, idx: usize, name: impl Into<String>) {
        self.columns[idx].name = name.into();
    }

    pub fn insert_column(&mut self, at: usize, column: Column, values: Vec<CellValue>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.insert(at, column);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.insert(at, value);
        }
    }

    pub fn push_column(&mut self, column: Column, values: Vec<CellValue>) {
        let at = self.columns.len();
        self.insert_column(at, column, values);
    }

    /// Drop a column by name. Returns whether it existed.
    pub fn drop_column(&mut self, name: &str) -> bool {
        let Some(idx) = self.column_index(name) else {
            return false;
        };
        self.columns.remove(idx);
        for row in &mut self.rows {
            row.remove(idx);
        }
        true
    }

    /// Keep only the columns for which `keep` returns true.
    pub fn retain_columns(&mut self, mut keep: impl FnMut(usize, &Column) -> bool) {
        let mask: Vec<bool> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| keep(i, c))
            .collect();
        if mask.iter().all(|k| *k) {
            return;
        }
        let mut i = 0;
        self.columns.retain(|_| {
            i += 1;
            mask[i - 1]
        });
        for row in &mut self.rows {
            let mut i = 0;
            row.retain(|_| {
                i += 1;
                mask[i - 1]
            });
        }
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    pub fn retain_rows(&mut self, keep: impl FnMut(&Vec<CellValue>) -> bool) {
        self.rows.retain(keep);
    }

    /// Replace every cell of a column with `f(cell)`.
    pub fn map_column(&mut self, idx: usize, mut f: impl FnMut(&CellValue) -> CellValue) {
        for row in &mut self.rows {
            row[idx] = f(&row[idx]);
        }
    }
}
