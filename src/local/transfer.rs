//! JSON file export and import.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::error::LocalError;
use crate::models::Timetable;

pub fn export_to_string(timetable: &Timetable) -> Result<String, LocalError> {
    Ok(serde_json::to_string_pretty(timetable)?)
}

/// `履修登録_2025-04-01.json`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("履修登録_{}.json", date.format("%Y-%m-%d"))
}

/// Writes the timetable into `dir` under the dated export name.
pub fn export_to_dir(dir: &Path, timetable: &Timetable, date: NaiveDate) -> Result<PathBuf, LocalError> {
    let path = dir.join(export_file_name(date));
    export_to_path(&path, timetable)?;
    Ok(path)
}

pub fn export_to_path(path: &Path, timetable: &Timetable) -> Result<(), LocalError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, export_to_string(timetable)?)?;
    info!("exported timetable to {}", path.display());
    Ok(())
}

/// Parses exported text. The text must be a JSON object; keys outside the
/// timetable layout are ignored and missing slots are filled in as empty.
pub fn import_from_str(text: &str) -> Result<Timetable, LocalError> {
    let value: Value = serde_json::from_str(text)?;
    Timetable::from_value_lenient(&value)
        .ok_or_else(|| LocalError::NotATimetable("expected a JSON object".to_string()))
}

pub fn import_from_path(path: &Path) -> Result<Timetable, LocalError> {
    let text = fs::read_to_string(path)?;
    import_from_str(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Course, Day, Semester, SlotRef};

    #[test]
    fn export_name_contains_date() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(export_file_name(date), "履修登録_2025-04-01.json");
    }

    #[test]
    fn export_is_indented() {
        let text = export_to_string(&Timetable::new_initial()).unwrap();
        assert!(text.contains("\n  \"1年春学期\""));
    }

    #[test]
    fn import_round_trips_export() {
        let timetable = Timetable::new_initial()
            .place_course(Semester::Y1Spring, Day::Mon, 1, Course::new("線形代数", 2).unwrap())
            .place_course(Semester::Y1Spring, Day::Tue, 2, Course::new("英語", 1).unwrap())
            .move_course(Semester::Y1Spring, SlotRef::new(Day::Mon, 1), SlotRef::new(Day::Tue, 2))
            .remove_course(Semester::Y1Spring, Day::Tue, 2);

        let text = export_to_string(&timetable).unwrap();
        assert_eq!(import_from_str(&text).unwrap(), timetable);
    }

    #[test]
    fn malformed_import_is_an_error() {
        assert!(matches!(import_from_str("{\"1年春学期\": "), Err(LocalError::Parse(_))));
        assert!(matches!(import_from_str("[1, 2, 3]"), Err(LocalError::NotATimetable(_))));
    }

    #[test]
    fn import_ignores_unknown_keys() {
        let text = r#"{
            "version": 2,
            "exportedAt": "2025-04-01",
            "1年春学期": { "月": { "1": { "name": "線形代数", "credits": 2 }, "note": "x" } }
        }"#;

        let timetable = import_from_str(text).unwrap();

        assert!(timetable.is_dense());
        assert_eq!(timetable.get(Semester::Y1Spring, Day::Mon, 1).unwrap().name, "線形代数");
        assert_eq!(timetable.total_credits(), 2);
    }

    #[test]
    fn imported_credit_totals_saturate() {
        let text = r#"{
            "1年春学期": { "月": { "1": { "name": "a", "credits": 4000000000 } } },
            "1年秋学期": { "月": { "1": { "name": "b", "credits": 4000000000 } } }
        }"#;

        let timetable = import_from_str(text).unwrap();

        assert_eq!(timetable.credits_for_semester(Semester::Y1Fall), 4_000_000_000);
        assert_eq!(timetable.total_credits(), u32::MAX);
    }
}
