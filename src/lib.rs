//! Two-stage cleaner for workforce-management state reports.
//!
//! A raw `.xls`/`.xlsx` export is normalized into the cleaned report
//! ("Fichier 1"), then averaged and filtered into the final report
//! ("Fichier final"). See [`pipeline::run_pipeline`].

pub mod data;
pub mod error;
pub mod pipeline;
pub mod session;

pub use data::filter::FilterConfig;
pub use data::model::{CellValue, Table};
pub use error::{PipelineError, Result};
pub use pipeline::{run_pipeline, PipelineOutput};
pub use session::ReportSession;
