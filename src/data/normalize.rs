//! Stage 1: raw export → cleaned table ("Fichier 1").

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::model::{CellValue, Column, Table};
use super::numeric::Numeric;
use super::schema::{
    RawRole, AGENT_ID, AGENT_NAME, ANCHOR_POSITION, BREAK, EXCLUDED_STATE, FIRST_EXTRA_POSITION,
    GENERIC_BREAK, OCCURRENCES, RAW_ROLES, STATE, STATE_SUBSTITUTIONS, TOTAL_TIME,
};
use super::time::to_canonical;
use crate::error::{PipelineError, Result};

fn agent_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Agent\s+(\d{4})").expect("valid agent id regex"))
}

/// Clean a raw sheet. The input is left untouched; the result is a new table
/// whose row count never exceeds the input's.
pub fn normalize(raw: &Table) -> Result<Table> {
    let mut table = raw.clone();

    drop_empty(&mut table);
    log::debug!("stage 1: {} rows after dropping empty rows", table.len());

    let anchor = table
        .position_index(ANCHOR_POSITION)
        .ok_or_else(|| PipelineError::Schema {
            missing: vec![role_label(ANCHOR_POSITION, AGENT_NAME)],
        })?;
    forward_fill(&mut table, anchor);

    apply_roles(&mut table)?;

    let state = index_of(&table, STATE)?;
    table.retain_rows(|row| !row[state].is_null());

    let name = index_of(&table, AGENT_NAME)?;
    let ids: Vec<CellValue> = table
        .column_values(name)
        .map(|cell| extract_agent_id(&cell.to_string()).into())
        .collect();
    table.insert_column(0, Column::derived(AGENT_ID), ids);

    let relabeled = relabel_repeated_breaks(&mut table);
    log::debug!("stage 1: {relabeled} repeated breaks relabeled");

    let total = index_of(&table, TOTAL_TIME)?;
    table.map_column(total, to_canonical);

    let state = index_of(&table, STATE)?;
    table.map_column(state, substitute_state);
    table.retain_rows(|row| row[state].to_string().to_lowercase() != EXCLUDED_STATE);

    let occurrences = index_of(&table, OCCURRENCES)?;
    table.map_column(occurrences, |cell| Numeric::coerce(cell).to_cell());

    log::debug!(
        "stage 1: {} rows in, {} rows out",
        raw.len(),
        table.len()
    );
    Ok(table)
}

/// Remove rows, then columns, made only of nulls.
fn drop_empty(table: &mut Table) {
    table.retain_rows(|row| row.iter().any(|c| !c.is_null()));
    let empty: Vec<bool> = (0..table.columns.len())
        .map(|i| table.column_values(i).all(CellValue::is_null))
        .collect();
    table.retain_columns(|i, _| !empty[i]);
}

/// Last observation carried forward, in row order.
fn forward_fill(table: &mut Table, idx: usize) {
    let mut last = CellValue::Null;
    for row in &mut table.rows {
        if row[idx].is_null() {
            row[idx] = last.clone();
        } else {
            last = row[idx].clone();
        }
    }
}

/// Rename positional columns to their semantic names, fail on any required
/// role that is absent, then drop the columns nobody needs.
fn apply_roles(table: &mut Table) -> Result<()> {
    let mut missing = Vec::new();
    for &(position, role) in RAW_ROLES {
        let RawRole::Required(name) = role else {
            continue;
        };
        match table.position_index(position) {
            Some(idx) => table.rename_column(idx, name),
            None => missing.push(role_label(position, name)),
        }
    }
    if !missing.is_empty() {
        return Err(PipelineError::Schema { missing });
    }

    let dropped: Vec<usize> = RAW_ROLES
        .iter()
        .filter(|(_, role)| *role == RawRole::Dropped)
        .map(|(position, _)| *position)
        .collect();
    table.retain_columns(|_, col| match col.position {
        Some(p) if dropped.contains(&p) => false,
        Some(p) => !(col.is_unlabeled() && p >= FIRST_EXTRA_POSITION),
        None => true,
    });
    Ok(())
}

fn role_label(position: usize, name: &str) -> String {
    format!("{name} (column {position})")
}

fn index_of(table: &Table, name: &str) -> Result<usize> {
    table.column_index(name).ok_or_else(|| PipelineError::Schema {
        missing: vec![name.to_string()],
    })
}

/// Four digits following `Agent` and whitespace, e.g. `Agent 4821 - John Doe`.
pub fn extract_agent_id(name: &str) -> Option<&str> {
    agent_id_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Within each agent, keep the first `Pause` and turn every later one into
/// `Pause générique`. Returns how many rows were relabeled.
///
/// Row order is taken to be chronological within an agent. Rows without an
/// agent id belong to no group and are never relabeled.
pub fn relabel_repeated_breaks(table: &mut Table) -> usize {
    let (Some(id_idx), Some(state_idx)) = (table.column_index(AGENT_ID), table.column_index(STATE))
    else {
        return 0;
    };

    let mut seen_break: HashSet<String> = HashSet::new();
    let mut relabeled = 0;
    for row in &mut table.rows {
        if row[state_idx].as_str() != Some(BREAK) {
            continue;
        }
        let CellValue::String(id) = &row[id_idx] else {
            continue;
        };
        if !seen_break.insert(id.clone()) {
            row[state_idx] = CellValue::from(GENERIC_BREAK);
            relabeled += 1;
        }
    }
    relabeled
}

fn substitute_state(cell: &CellValue) -> CellValue {
    let Some(label) = cell.as_str() else {
        return cell.clone();
    };
    STATE_SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == label)
        .map(|(_, to)| CellValue::from(*to))
        .unwrap_or_else(|| cell.clone())
}
