use std::collections::BTreeSet;

use crate::data::filter::{filter, FilterConfig};
use crate::data::model::{CellValue, Table};
use crate::data::schema::{DEFAULT_ALLOWED_STATES, STATE};
use crate::error::Result;
use crate::pipeline::{run_pipeline, PipelineOutput};

// ---------------------------------------------------------------------------
// Report session
// ---------------------------------------------------------------------------

/// One uploaded report with its current filter settings.
///
/// Stage 1 runs once when the session opens. Every parameter change re-runs
/// Stage 2 only, against the cached cleaned table.
#[derive(Debug, Clone)]
pub struct ReportSession {
    output: PipelineOutput,
    config: FilterConfig,
}

impl ReportSession {
    pub fn open(bytes: &[u8], filename: &str, config: FilterConfig) -> Result<Self> {
        let output = run_pipeline(bytes, filename, &config)?;
        Ok(Self { output, config })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn output(&self) -> &PipelineOutput {
        &self.output
    }

    pub fn cleaned(&self) -> &Table {
        &self.output.cleaned
    }

    pub fn final_table(&self) -> &Table {
        &self.output.final_table
    }

    /// Sorted text states present in the cleaned table.
    pub fn states_present(&self) -> BTreeSet<String> {
        self.output
            .cleaned
            .distinct(STATE)
            .into_iter()
            .filter_map(|v| match v {
                CellValue::String(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn set_max_average_seconds(&mut self, seconds: u32) -> Result<()> {
        self.apply(FilterConfig {
            max_average_seconds: seconds,
            ..self.config.clone()
        })
    }

    /// Rejects 0 and keeps the previous settings in that case.
    pub fn set_min_occurrences(&mut self, min: u32) -> Result<()> {
        self.apply(FilterConfig {
            min_occurrences: min,
            ..self.config.clone()
        })
    }

    /// Toggle a single state in the allow-list.
    pub fn toggle_state(&mut self, state: &str) -> Result<()> {
        let mut config = self.config.clone();
        if !config.allowed_states.remove(state) {
            config.allowed_states.insert(state.to_string());
        }
        self.apply(config)
    }

    /// Reset the allow-list to the default vocabulary.
    pub fn select_all_states(&mut self) -> Result<()> {
        let mut config = self.config.clone();
        config.allowed_states = DEFAULT_ALLOWED_STATES.iter().map(|s| s.to_string()).collect();
        self.apply(config)
    }

    pub fn select_no_states(&mut self) -> Result<()> {
        let mut config = self.config.clone();
        config.allowed_states.clear();
        self.apply(config)
    }

    /// Recompute the final table after a settings change.
    fn apply(&mut self, config: FilterConfig) -> Result<()> {
        config.validate()?;
        self.output.final_table = filter(&self.output.cleaned, &config)?;
        self.config = config;
        log::debug!(
            "refiltered: {} of {} cleaned rows kept",
            self.output.final_rows(),
            self.output.cleaned_rows()
        );
        Ok(())
    }
}
