use thiserror::Error;

/// Fatal pipeline errors. Per-row data problems never end up here; they
/// become nulls and fall out at the Stage-2 admission rule.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Unsupported extension or bytes that are not a readable workbook.
    #[error("format error: {0}")]
    Format(String),

    /// Structural anchor or required columns missing from the raw sheet.
    #[error("schema error: missing column(s) {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
