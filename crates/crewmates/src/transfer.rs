//! Import and export of crewmate collections.
//!
//! Exports are JSON (full records) or CSV (name, color, speed, date). Imports
//! read a JSON array of `{name, color, speed}` objects and are validated as a
//! whole before anything is created.

use std::borrow::Borrow;
use std::fmt::Write as _;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

use crate::crewmate::{Crewmate, CrewmateDraft, MAX_SPEED};
use crate::error::{Error, Result};
use crate::stats::{average_speed, ColorHistogram, SpeedTier, SpeedTiers};
use crate::storage::CrewmateStore;

/// Header row of CSV exports.
pub const CSV_HEADER: &str = "Name,Color,Speed,Created At";

/// Export crewmates as a pretty-printed JSON array of full records.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn export_json<C: Borrow<Crewmate>>(crew: &[C]) -> Result<String> {
    let records: Vec<&Crewmate> = crew.iter().map(Borrow::borrow).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Export crewmates as CSV.
///
/// Names are always quoted; embedded quotes are doubled. Dates are the UTC
/// creation day.
#[must_use]
pub fn export_csv<C: Borrow<Crewmate>>(crew: &[C]) -> String {
    let mut out = String::from(CSV_HEADER);
    for c in crew {
        let c = c.borrow();
        let _ = write!(
            out,
            "\n\"{}\",{},{},{}",
            c.name.replace('"', "\"\""),
            c.color,
            c.speed,
            c.created_on().format("%Y-%m-%d"),
        );
    }
    out
}

/// Default export file name for a given day, e.g. `crewmates-export-2026-10-17.json`.
#[must_use]
pub fn default_export_filename(today: NaiveDate, extension: &str) -> String {
    format!("crewmates-export-{}.{extension}", today.format("%Y-%m-%d"))
}

/// Parse and validate an import file.
///
/// Only `name`, `color` and `speed` are read; other fields are ignored. The
/// first invalid entry rejects the whole batch.
///
/// `speed` must be a number in `0..=100` with no fractional part, since
/// crewmate speeds are whole numbers: `100.0` is accepted as 100 while `50.5`
/// is rejected rather than rounded.
///
/// # Errors
///
/// Returns [`Error::ImportFormat`] if the text is not a JSON array, or
/// [`Error::ImportEntry`] naming the first invalid entry.
pub fn parse_import(text: &str) -> Result<Vec<CrewmateDraft>> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::import_batch(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(Error::import_batch("Expected an array of crewmates"));
    };

    let drafts = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(entry).map_err(|msg| Error::import_entry(index, msg)))
        .collect::<Result<Vec<_>>>()?;

    debug!("Parsed {} import entries", drafts.len());
    Ok(drafts)
}

fn parse_entry(entry: &Value) -> std::result::Result<CrewmateDraft, &'static str> {
    let name = non_empty_str(entry, "name").ok_or("Missing or invalid name")?;
    let color = non_empty_str(entry, "color").ok_or("Missing or invalid color")?;
    let speed = entry
        .get("speed")
        .and_then(Value::as_f64)
        .filter(|s| (0.0..=f64::from(MAX_SPEED)).contains(s))
        .ok_or("Speed must be a number between 0 and 100")?;
    if speed.fract() > 0.0 {
        return Err("Speed must be a whole number");
    }
    // Integral and within 0..=100.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let speed = speed as u8;

    Ok(CrewmateDraft {
        name: name.to_string(),
        speed,
        color: color.to_string(),
        ..CrewmateDraft::default()
    })
}

fn non_empty_str<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Create every draft through the store, in order.
///
/// Returns the created crewmates. A store failure stops the import; entries
/// created before it remain.
///
/// # Errors
///
/// Returns the first store error.
pub fn import_into<S: CrewmateStore + ?Sized>(
    store: &S,
    drafts: &[CrewmateDraft],
) -> Result<Vec<Crewmate>> {
    let created = drafts
        .iter()
        .map(|d| store.create(d))
        .collect::<Result<Vec<_>>>()?;
    info!("Imported {} crewmates", created.len());
    Ok(created)
}

/// A markdown summary of a crew.
#[must_use]
pub fn crew_report<C: Borrow<Crewmate>>(crew: &[C], today: NaiveDate) -> String {
    let colors = ColorHistogram::of(crew);
    let tiers = SpeedTiers::of(crew);
    let most_popular = colors
        .most_popular()
        .map_or_else(|| "None".to_string(), |b| b.to_string());

    let mut out = String::new();
    let _ = writeln!(out, "# Crew Report - {}", today.format("%Y-%m-%d"));
    out.push_str("\n## Overview\n");
    let _ = writeln!(out, "- **Total Crewmates**: {}", crew.len());
    let _ = writeln!(out, "- **Average Speed**: {:.1}", average_speed(crew));
    let _ = writeln!(out, "- **Most Popular Color**: {most_popular}");

    out.push_str("\n## Speed Distribution\n");
    for tier in SpeedTier::ALL {
        let _ = writeln!(out, "- **{}**: {} crewmates", tier.label(), tiers.get(tier));
    }

    out.push_str("\n## Color Breakdown\n");
    for (bucket, count) in colors.ranked() {
        let plural = if count == 1 { "" } else { "s" };
        let _ = writeln!(out, "- **{bucket}**: {count} crewmate{plural}");
    }

    out.push_str("\n## Crew List\n");
    for c in crew {
        let c = c.borrow();
        let _ = writeln!(out, "- {} ({}, Speed: {})", c.name, c.color, c.speed);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crewmate::fixtures::{crewmate, now};
    use crate::storage::Storage;

    fn entry_error(text: &str) -> (usize, String) {
        match parse_import(text) {
            Err(Error::ImportEntry { index, message }) => (index, message),
            other => panic!("expected entry error, got {other:?}"),
        }
    }

    #[test]
    fn test_export_csv() {
        let crew = vec![
            crewmate("1", "Red \"Ace\"", 80, "red", 0),
            crewmate("2", "Blue, Jr", 20, "blue", 1),
        ];
        let csv = export_csv(&crew);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "\"Red \"\"Ace\"\"\",red,80,2026-10-17");
        assert_eq!(lines[2], "\"Blue, Jr\",blue,20,2026-10-16");
    }

    #[test]
    fn test_export_csv_empty() {
        let crew: Vec<Crewmate> = Vec::new();
        assert_eq!(export_csv(&crew), CSV_HEADER);
    }

    #[test]
    fn test_export_json_is_full_records() {
        let crew = vec![crewmate("abc", "Jay", 33, "lime", 0)];
        let json = export_json(&crew).unwrap();
        assert!(json.contains('\n'));
        let back: Vec<Crewmate> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, crew);
    }

    #[test]
    fn test_default_export_filename() {
        assert_eq!(
            default_export_filename(now().date_naive(), "csv"),
            "crewmates-export-2026-10-17.csv"
        );
    }

    #[test]
    fn test_parse_import_ignores_extra_fields() {
        let drafts = parse_import(
            r#"[{"name":"Zed","color":"purple","speed":42,"id":"x","is_favorite":true}]"#,
        )
        .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].name, "Zed");
        assert_eq!(drafts[0].color, "purple");
        assert_eq!(drafts[0].speed, 42);
        assert!(!drafts[0].is_favorite);
    }

    #[test]
    fn test_parse_import_accepts_unknown_color() {
        let drafts = parse_import(r#"[{"name":"Tee","color":"teal","speed":0}]"#).unwrap();
        assert_eq!(drafts[0].color, "teal");
    }

    #[test]
    fn test_parse_import_speed_out_of_range() {
        let (index, message) = entry_error(r#"[{"name":"A","color":"red","speed":150}]"#);
        assert_eq!(index, 0);
        assert_eq!(message, "Speed must be a number between 0 and 100");
    }

    #[test]
    fn test_parse_import_reports_first_bad_index() {
        let (index, message) = entry_error(
            r#"[{"name":"Ok","color":"red","speed":1},
                {"name":"","color":"red","speed":1},
                {"color":"red","speed":1}]"#,
        );
        assert_eq!(index, 1);
        assert_eq!(message, "Missing or invalid name");
    }

    #[test]
    fn test_parse_import_field_messages() {
        assert_eq!(
            entry_error(r#"[{"name":"Ok","color":5,"speed":1}]"#).1,
            "Missing or invalid color"
        );
        assert_eq!(
            entry_error(r#"[{"name":"Ok","color":"red","speed":"fast"}]"#).1,
            "Speed must be a number between 0 and 100"
        );
        assert_eq!(
            entry_error(r#"[{"name":"Ok","color":"red","speed":-1}]"#).1,
            "Speed must be a number between 0 and 100"
        );
        assert_eq!(
            entry_error(r#"[{"name":"Ok","color":"red","speed":12.5}]"#).1,
            "Speed must be a whole number"
        );
    }

    #[test]
    fn test_parse_import_accepts_integral_float() {
        let drafts = parse_import(r#"[{"name":"Ok","color":"red","speed":100.0}]"#).unwrap();
        assert_eq!(drafts[0].speed, 100);
    }

    #[test]
    fn test_parse_import_rejects_non_array() {
        let err = parse_import(r#"{"name":"Zed"}"#).unwrap_err();
        assert!(matches!(err, Error::ImportFormat { .. }));
        assert!(err.to_string().contains("Expected an array of crewmates"));

        let err = parse_import("not json").unwrap_err();
        assert!(matches!(err, Error::ImportFormat { .. }));
    }

    #[test]
    fn test_parse_import_empty_array() {
        assert!(parse_import("[]").unwrap().is_empty());
    }

    #[test]
    fn test_import_into_creates_fresh_records() {
        let store = Storage::open_in_memory().unwrap();
        let drafts = parse_import(
            r#"[{"name":"One","color":"red","speed":10},{"name":"Two","color":"blue","speed":20}]"#,
        )
        .unwrap();
        let created = import_into(&store, &drafts).unwrap();
        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_round_trip_through_json() {
        let store = Storage::open_in_memory().unwrap();
        let original = vec![
            crewmate("1", "Alpha", 10, "red", 3),
            crewmate("2", "Beta", 90, "cyan", 1),
        ];
        let json = export_json(&original).unwrap();
        let created = import_into(&store, &parse_import(&json).unwrap()).unwrap();

        let project = |c: &Crewmate| (c.name.clone(), c.color.clone(), c.speed);
        assert_eq!(
            created.iter().map(project).collect::<Vec<_>>(),
            original.iter().map(project).collect::<Vec<_>>()
        );
        assert!(created.iter().all(|c| c.id.as_str() != "1" && c.id.as_str() != "2"));
    }

    #[test]
    fn test_crew_report() {
        let crew = vec![
            crewmate("1", "Alpha", 10, "red", 0),
            crewmate("2", "Beta", 50, "red", 0),
            crewmate("3", "Gamma", 90, "blue", 0),
        ];
        let report = crew_report(&crew, now().date_naive());
        assert!(report.starts_with("# Crew Report - 2026-10-17"));
        assert!(report.contains("- **Total Crewmates**: 3"));
        assert!(report.contains("- **Average Speed**: 50.0"));
        assert!(report.contains("- **Most Popular Color**: red"));
        assert!(report.contains("- **Slow (0-33)**: 1 crewmates"));
        assert!(report.contains("- **red**: 2 crewmates"));
        assert!(report.contains("- **blue**: 1 crewmate\n"));
        assert!(report.contains("- Gamma (blue, Speed: 90)"));
    }

    #[test]
    fn test_crew_report_empty() {
        let crew: Vec<Crewmate> = Vec::new();
        let report = crew_report(&crew, now().date_naive());
        assert!(report.contains("- **Most Popular Color**: None"));
        assert!(report.contains("- **Average Speed**: 0.0"));
    }
}
