//! Stage 2: cleaned table → final table ("Fichier final").

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::model::{CellValue, Column, Table};
use super::numeric::Numeric;
use super::schema::{
    AVERAGE_TIME, AVERAGE_TIME_SECONDS, DEFAULT_ALLOWED_STATES, OCCURRENCES, STATE,
    TOTAL_TIME, TOTAL_TIME_SECONDS,
};
use super::time::{format_seconds, parse_seconds};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Admission rule parameters
// ---------------------------------------------------------------------------

/// Thresholds of the admission rule. Every field falls back to its default
/// when absent from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Ceiling on the per-occurrence average, in seconds.
    pub max_average_seconds: u32,
    /// Floor on the occurrence count; at least 1.
    pub min_occurrences: u32,
    /// States admitted into the final table.
    pub allowed_states: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_average_seconds: 120,
            min_occurrences: 3,
            allowed_states: DEFAULT_ALLOWED_STATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FilterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_occurrences == 0 {
            return Err(PipelineError::Config(
                "min_occurrences must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: FilterConfig = serde_json::from_str(text)
            .map_err(|e| PipelineError::Config(format!("parsing filter config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

// ---------------------------------------------------------------------------
// Stage 2
// ---------------------------------------------------------------------------

/// Compute the per-occurrence average and keep the rows that pass the
/// admission rule:
///
/// * occurrences present and non-zero (rows failing this never reach the division),
/// * average ≤ `max_average_seconds` (a null average never passes),
/// * state in `allowed_states` and occurrences ≥ `min_occurrences`.
///
/// The result gains a `Moy Temps Total` column (`HH:MM:SS`); the seconds
/// helpers are dropped before returning.
pub fn filter(cleaned: &Table, config: &FilterConfig) -> Result<Table> {
    let mut table = cleaned.clone();
    let total = column(&table, TOTAL_TIME)?;
    let occurrences = column(&table, OCCURRENCES)?;
    let state = column(&table, STATE)?;

    let seconds: Vec<CellValue> = table
        .column_values(total)
        .map(|cell| parse_seconds(cell).into())
        .collect();
    table.push_column(Column::derived(TOTAL_TIME_SECONDS), seconds);
    let seconds = column(&table, TOTAL_TIME_SECONDS)?;

    table.map_column(occurrences, |cell| Numeric::coerce(cell).to_cell());
    table.retain_rows(|row| Numeric::coerce(&row[occurrences]).gt(0.0));
    log::debug!("stage 2: {} rows with a usable occurrence count", table.len());

    let averages: Vec<Numeric> = table
        .rows
        .iter()
        .map(|row| Numeric::coerce(&row[seconds]) / Numeric::coerce(&row[occurrences]))
        .collect();
    let display = averages
        .iter()
        .map(|avg| CellValue::String(format_seconds(avg.value())))
        .collect();
    table.push_column(
        Column::derived(AVERAGE_TIME_SECONDS),
        averages.iter().map(|avg| avg.to_cell()).collect(),
    );
    table.push_column(Column::derived(AVERAGE_TIME), display);
    let average = column(&table, AVERAGE_TIME_SECONDS)?;

    let ceiling = f64::from(config.max_average_seconds);
    table.retain_rows(|row| Numeric::coerce(&row[average]).le(ceiling));
    log::debug!("stage 2: {} rows within {ceiling}s average", table.len());

    let floor = f64::from(config.min_occurrences);
    table.retain_rows(|row| {
        let allowed = row[state]
            .as_str()
            .is_some_and(|s| config.allowed_states.contains(s));
        allowed && Numeric::coerce(&row[occurrences]).ge(floor)
    });

    table.drop_column(TOTAL_TIME_SECONDS);
    table.drop_column(AVERAGE_TIME_SECONDS);

    log::debug!(
        "stage 2: {} rows in, {} rows out",
        cleaned.len(),
        table.len()
    );
    Ok(table)
}

fn column(table: &Table, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| PipelineError::Schema {
        missing: vec![name.to_string()],
    })
}
