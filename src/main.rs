use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use wfm_cleaner::data::writer::write_csv;
use wfm_cleaner::pipeline::{CLEANED_REPORT_FILE, FINAL_REPORT_FILE};
use wfm_cleaner::{run_pipeline, FilterConfig, Table};

#[derive(Parser)]
#[command(name = "wfm-cleaner")]
#[command(about = "Clean a raw WFM state report into the cleaned and final filtered reports")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Raw report exported from the WFM platform (.xls or .xlsx)
    input: PathBuf,
    /// Directory receiving both output workbooks
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// JSON file with filter settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ceiling on the average time per occurrence, in seconds
    #[arg(long)]
    max_average_seconds: Option<u32>,
    /// Minimum occurrence count
    #[arg(long)]
    min_occurrences: Option<u32>,
    /// Allowed state (repeatable); replaces the configured list
    #[arg(long = "state")]
    states: Vec<String>,
    /// Print the first N rows of each table as CSV
    #[arg(long)]
    preview: Option<usize>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli)?;

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    let filename = cli
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output = run_pipeline(&bytes, &filename, &config)?;

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;
    let cleaned_path = cli.out_dir.join(CLEANED_REPORT_FILE);
    fs::write(&cleaned_path, output.cleaned_report()?)
        .with_context(|| format!("writing {}", cleaned_path.display()))?;
    let final_path = cli.out_dir.join(FINAL_REPORT_FILE);
    fs::write(&final_path, output.final_report()?)
        .with_context(|| format!("writing {}", final_path.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Lignes (Brut):        {}", output.raw_rows)?;
    writeln!(out, "Lignes (Fichier 1):   {}", output.cleaned_rows())?;
    writeln!(out, "Lignes (Final):       {}", output.final_rows())?;
    writeln!(out, "États sélectionnés:   {}", config.allowed_states.len())?;
    writeln!(out, "Moy Temps Total ≤ {} sec, Occurances ≥ {}", config.max_average_seconds, config.min_occurrences)?;
    writeln!(out, "Wrote {} and {}", cleaned_path.display(), final_path.display())?;

    if let Some(n) = cli.preview {
        preview(&mut out, "Fichier final", &output.final_table, n)?;
        preview(&mut out, "Fichier 1", &output.cleaned, n)?;
    }
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<FilterConfig> {
    let mut config = match &cli.config {
        Some(path) => FilterConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => FilterConfig::default(),
    };
    if let Some(max) = cli.max_average_seconds {
        config.max_average_seconds = max;
    }
    if let Some(min) = cli.min_occurrences {
        config.min_occurrences = min;
    }
    if !cli.states.is_empty() {
        config.allowed_states = cli.states.iter().cloned().collect();
    }
    config.validate()?;
    Ok(config)
}

fn preview(out: &mut impl Write, title: &str, table: &Table, rows: usize) -> Result<()> {
    writeln!(out, "\n# {title} ({} rows)", table.len())?;
    write_csv(table, &mut *out, Some(rows))?;
    Ok(())
}
