mod support;

use std::collections::BTreeSet;

use support::{column_text, raw_workbook};
use wfm_cleaner::data::loader::load_bytes;
use wfm_cleaner::data::schema::{AGENT_ID, AVERAGE_TIME, STATE, TOTAL_TIME};
use wfm_cleaner::{run_pipeline, FilterConfig, PipelineError, ReportSession};

fn config(max: u32, min: u32, states: &[&str]) -> FilterConfig {
    FilterConfig {
        max_average_seconds: max,
        min_occurrences: min,
        allowed_states: states.iter().map(|s| s.to_string()).collect(),
    }
}

fn report() -> Vec<u8> {
    raw_workbook(&[
        (Some("Agent 4821 - John Doe"), Some("Meeting"), Some(4.0), "0h2'0"),
        (None, Some("Pause"), Some(3.0), "00:01:30"),
        (None, Some("Pause"), Some(3.0), "0h1'0"),
        (None, Some("Pause"), Some(6.0), "00:03:00"),
        (None, Some("en attente"), Some(5.0), "00:00:50"),
        (None, Some("Training"), Some(0.0), "00:00:00"),
        (None, None, None, ""),
        (Some("Agent 1234 - Jane Roe"), Some("Pause"), Some(4.0), "00:02:00"),
        (None, Some("Attente"), Some(4.0), "00:02:00"),
        (None, Some("Meeting"), Some(2.0), "00:00:20"),
    ])
}

#[test]
fn raw_export_loads_with_placeholder_headers() {
    let raw = load_bytes(&report(), "export.xlsx").unwrap();
    assert_eq!(raw.column_names()[0], "Unnamed: 0");
    assert_eq!(raw.column_names()[6], "Unnamed: 6");
    assert_eq!(raw.len(), 10);
}

#[test]
fn cleaned_report_is_normalized() {
    let out = run_pipeline(&report(), "export.xlsx", &FilterConfig::default()).unwrap();
    assert_eq!(out.raw_rows, 10);
    assert!(out.cleaned_rows() <= out.raw_rows);

    assert_eq!(
        column_text(&out.cleaned, STATE),
        vec![
            "Meeting",
            "Pause global",
            "Pause générique",
            "Pause générique",
            "Training",
            "Pause global",
            "Attente global",
            "Meeting",
        ]
    );
    assert_eq!(
        column_text(&out.cleaned, AGENT_ID),
        vec!["4821", "4821", "4821", "4821", "4821", "1234", "1234", "1234"]
    );
    assert_eq!(column_text(&out.cleaned, TOTAL_TIME)[0], "00:02:00");
    assert_eq!(column_text(&out.cleaned, TOTAL_TIME)[2], "00:01:00");
}

#[test]
fn final_report_applies_the_admission_rule() {
    let out = run_pipeline(
        &report(),
        "export.xlsx",
        &config(60, 3, &["Meeting", "Pause générique", "Training"]),
    )
    .unwrap();
    assert_eq!(
        column_text(&out.final_table, STATE),
        vec!["Meeting", "Pause générique", "Pause générique"]
    );
    assert_eq!(
        column_text(&out.final_table, AVERAGE_TIME),
        vec!["00:00:30", "00:00:20", "00:00:30"]
    );
    assert!(!out.final_table.has_column("Temps total (sec)"));
    assert!(!out.final_table.has_column("Moy Temps Total (sec)"));
}

#[test]
fn awaiting_rows_never_reach_the_final_report() {
    let out = run_pipeline(&report(), "export.xlsx", &config(600, 1, &["en attente", "En attente"]))
        .unwrap();
    assert!(out.final_table.is_empty());
}

#[test]
fn reports_round_trip_through_xlsx() {
    let out = run_pipeline(&report(), "export.xlsx", &FilterConfig::default()).unwrap();

    let cleaned = load_bytes(&out.cleaned_report().unwrap(), "rapport_nettoye.xlsx").unwrap();
    assert_eq!(cleaned.column_names(), out.cleaned.column_names());
    assert_eq!(cleaned.len(), out.cleaned_rows());

    let fin = load_bytes(&out.final_report().unwrap(), "rapport_final.xlsx").unwrap();
    assert_eq!(fin.column_names(), out.final_table.column_names());
    assert_eq!(fin.len(), out.final_rows());
}

#[test]
fn missing_columns_abort_the_pipeline() {
    let bytes = raw_workbook(&[(Some("Agent 4821 - X"), Some("Meeting"), None, "00:01:00")]);
    let err = run_pipeline(&bytes, "export.xlsx", &FilterConfig::default()).unwrap_err();
    match err {
        PipelineError::Schema { missing } => assert_eq!(missing, vec!["Occurances (column 4)"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn wrong_format_aborts_the_pipeline() {
    let err = run_pipeline(&report(), "export.xls", &FilterConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Format(_)));
    let err = run_pipeline(&report(), "export.pdf", &FilterConfig::default()).unwrap_err();
    assert!(matches!(err, PipelineError::Format(_)));
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let err = run_pipeline(b"", "export.xlsx", &config(60, 0, &["Meeting"])).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn session_refilters_without_reloading() {
    let mut session =
        ReportSession::open(&report(), "export.xlsx", config(60, 3, &["Meeting"])).unwrap();
    assert_eq!(session.final_table().len(), 1);

    session.toggle_state("Pause générique").unwrap();
    assert_eq!(session.final_table().len(), 3);

    session.set_max_average_seconds(25).unwrap();
    assert_eq!(column_text(session.final_table(), AVERAGE_TIME), vec!["00:00:20"]);

    assert!(session.set_min_occurrences(0).is_err());
    assert_eq!(session.config().min_occurrences, 3);

    session.select_no_states().unwrap();
    assert!(session.final_table().is_empty());

    session.select_all_states().unwrap();
    assert_eq!(session.config().allowed_states.len(), 12);
    assert_eq!(session.cleaned().len(), 8);
}

#[test]
fn session_lists_states_present() {
    let session = ReportSession::open(&report(), "export.xlsx", FilterConfig::default()).unwrap();
    let expected: BTreeSet<String> = [
        "Attente global",
        "Meeting",
        "Pause global",
        "Pause générique",
        "Training",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(session.states_present(), expected);
}

#[test]
fn spreadsheet_time_cells_reach_the_final_report() {
    use rust_xlsxwriter::{Format, Workbook};

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let clock = Format::new().set_num_format("hh:mm:ss");
    let elapsed = Format::new().set_num_format("[h]:mm:ss");
    let lines = [
        (120.0 / 86_400.0, 4.0, &clock),
        (1.0 + 3_600.0 / 86_400.0, 1_500.0, &elapsed),
        (86_340.0 / 86_400.0, 1_439.0, &clock),
    ];
    for (i, (total, occ, format)) in lines.iter().enumerate() {
        let row = i as u32 + 1;
        if i == 0 {
            sheet.write_string(row, 0, "Agent 4821 - John Doe").unwrap();
        }
        sheet.write_string(row, 1, "Meeting").unwrap();
        sheet.write_string(row, 2, "12%").unwrap();
        sheet.write_string(row, 3, "-").unwrap();
        sheet.write_number(row, 4, *occ).unwrap();
        sheet.write_string(row, 5, "-").unwrap();
        sheet.write_number_with_format(row, 6, *total, *format).unwrap();
    }
    let bytes = workbook.save_to_buffer().unwrap();

    let out = run_pipeline(&bytes, "export.xlsx", &config(60, 3, &["Meeting"])).unwrap();
    assert_eq!(
        column_text(&out.cleaned, TOTAL_TIME),
        vec!["00:02:00", "25:00:00", "23:59:00"]
    );
    assert_eq!(
        column_text(&out.final_table, AVERAGE_TIME),
        vec!["00:00:30", "00:01:00", "00:01:00"]
    );
}
