use crate::data::filter::{filter, FilterConfig};
use crate::data::loader::load_bytes;
use crate::data::model::Table;
use crate::data::normalize::normalize;
use crate::data::writer::write_xlsx;
use crate::error::Result;

/// File name of the cleaned report ("Fichier 1").
pub const CLEANED_REPORT_FILE: &str = "rapport_nettoye.xlsx";
/// File name of the final filtered report ("Fichier final").
pub const FINAL_REPORT_FILE: &str = "rapport_final_moy_temps_filtre.xlsx";

pub const CLEANED_SHEET: &str = "rapport_nettoye";
pub const FINAL_SHEET: &str = "rapport_final";

/// Both pipeline outputs plus the raw row count.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub raw_rows: usize,
    pub cleaned: Table,
    pub final_table: Table,
}

impl PipelineOutput {
    pub fn cleaned_rows(&self) -> usize {
        self.cleaned.len()
    }

    pub fn final_rows(&self) -> usize {
        self.final_table.len()
    }

    pub fn cleaned_report(&self) -> Result<Vec<u8>> {
        write_xlsx(&self.cleaned, CLEANED_SHEET)
    }

    pub fn final_report(&self) -> Result<Vec<u8>> {
        write_xlsx(&self.final_table, FINAL_SHEET)
    }
}

/// Load an uploaded workbook and run both stages. Format and schema errors
/// abort with no partial output.
pub fn run_pipeline(bytes: &[u8], filename: &str, config: &FilterConfig) -> Result<PipelineOutput> {
    config.validate()?;

    let raw = load_bytes(bytes, filename)?;
    let cleaned = normalize(&raw)?;
    let final_table = filter(&cleaned, config)?;

    log::info!(
        "{filename}: {} raw rows, {} cleaned, {} final ({} states allowed)",
        raw.len(),
        cleaned.len(),
        final_table.len(),
        config.allowed_states.len()
    );

    Ok(PipelineOutput {
        raw_rows: raw.len(),
        cleaned,
        final_table,
    })
}
