//! Column names and state vocabulary of the WFM state report.

// ---------------------------------------------------------------------------
// Semantic column names
// ---------------------------------------------------------------------------

pub const AGENT_ID: &str = "Log Téléphonie1";
pub const AGENT_NAME: &str = "Nom Agent";
pub const STATE: &str = "Etat";
pub const OCCURRENCES: &str = "Occurances";
pub const TOTAL_TIME: &str = "Temps total";
pub const AVERAGE_TIME: &str = "Moy Temps Total";

/// Stage-2 helper columns, removed before the final table is returned.
pub const TOTAL_TIME_SECONDS: &str = "Temps total (sec)";
pub const AVERAGE_TIME_SECONDS: &str = "Moy Temps Total (sec)";

// ---------------------------------------------------------------------------
// Raw column roles
// ---------------------------------------------------------------------------

/// What a raw sheet column is used for, keyed by its source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawRole {
    /// Renamed to the given semantic name; missing means a schema error.
    Required(&'static str),
    /// Known to carry nothing useful.
    Dropped,
}

/// Source position of the agent-name anchor column.
pub const ANCHOR_POSITION: usize = 0;

/// Ordered role map of the raw export.
pub const RAW_ROLES: &[(usize, RawRole)] = &[
    (ANCHOR_POSITION, RawRole::Required(AGENT_NAME)),
    (1, RawRole::Required(STATE)),
    (3, RawRole::Dropped),
    (4, RawRole::Required(OCCURRENCES)),
    (5, RawRole::Dropped),
    (6, RawRole::Required(TOTAL_TIME)),
];

/// Unlabeled columns at or past this position are dropped.
pub const FIRST_EXTRA_POSITION: usize = 7;

// ---------------------------------------------------------------------------
// State vocabulary
// ---------------------------------------------------------------------------

/// Raw break label; the first one per agent keeps it.
pub const BREAK: &str = "Pause";
/// Label given to every later break of the same agent.
pub const GENERIC_BREAK: &str = "Pause générique";

/// Exact, case-sensitive label substitutions applied after break relabeling.
pub const STATE_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("Attente", "Attente global"),
    ("Pause", "Pause global"),
    ("Preview", "Histo Mailing"),
];

/// Rows in this state (compared case-insensitively) are removed.
pub const EXCLUDED_STATE: &str = "en attente";

/// States admitted into the final report unless the caller narrows the list.
pub const DEFAULT_ALLOWED_STATES: [&str; 12] = [
    "Aucun contexte démarré",
    "Back Office",
    "BUG IT",
    "Break",
    "Détachement",
    "Mailing",
    "Meeting",
    "Numérotation",
    "OJT",
    "Pause générique",
    "Rappel",
    "Training",
];
