//! Duration notations used by the report.
//!
//! * custom notation `1h2'3` (hours `h` minutes `'` seconds), as exported by
//!   the telephony platform;
//! * canonical `HH:MM:SS` text, hours unbounded;
//! * integer seconds.

use std::sync::OnceLock;

use regex::Regex;

use super::model::CellValue;

fn custom_notation() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)h(\d+)'(\d+)\s*$").expect("valid duration regex"))
}

/// Convert `1h2'3` to `01:02:03`. Any other text is returned unchanged.
pub fn to_canonical_str(text: &str) -> Option<String> {
    let caps = custom_notation().captures(text)?;
    let part = |i: usize| caps[i].parse::<u64>().ok();
    Some(format!("{:02}:{:02}:{:02}", part(1)?, part(2)?, part(3)?))
}

/// Cell-level [`to_canonical_str`]: non-matching and non-text cells pass through.
pub fn to_canonical(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::String(s) => to_canonical_str(s)
            .map(CellValue::String)
            .unwrap_or_else(|| cell.clone()),
        other => other.clone(),
    }
}

/// Parse `H:M:S` into seconds. Exactly three integer components are required;
/// anything else yields `None`.
pub fn parse_seconds_str(text: &str) -> Option<i64> {
    let mut parts = text.split(':');
    let (h, m, s) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let int = |p: &str| p.trim().parse::<i64>().ok();
    int(h)?
        .checked_mul(3600)?
        .checked_add(int(m)?.checked_mul(60)?)?
        .checked_add(int(s)?)
}

/// Parse the text form of a cell. Null cells yield `None`.
pub fn parse_seconds(cell: &CellValue) -> Option<i64> {
    if cell.is_null() {
        return None;
    }
    parse_seconds_str(&cell.to_string())
}

/// Format seconds as `HH:MM:SS`, rounding half to even. Missing or NaN input
/// gives an empty string. Hours are not wrapped at 24.
pub fn format_seconds(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| !v.is_nan()) else {
        return String::new();
    };
    let total = v.round_ties_even() as i64;
    let h = total.div_euclid(3600);
    let m = total.rem_euclid(3600) / 60;
    let s = total.rem_euclid(60);
    format!("{h:02}:{m:02}:{s:02}")
}
