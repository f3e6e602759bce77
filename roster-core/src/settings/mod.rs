use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{PreAssignment, ShiftKind, StaffId};

/// One raw row of `M_settings_YYYYMM.csv`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingRow {
    pub setting_id: String,
    pub value: String,
}

/// Typed view over the settings table for a single run, per spec §4.1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub monthly_holidays: u32,
    pub max_consecutive_work_days: u32,
    shift_display_names: HashMap<String, String>,
    pub pre_assignments: Vec<PreAssignment>,
}

const DEFAULT_MONTHLY_HOLIDAYS: u32 = 9;
const DEFAULT_MAX_CONSECUTIVE_WORK_DAYS: u32 = 5;

impl ResolvedSettings {
    pub fn shift_display_name(&self, kind: ShiftKind) -> String {
        self.shift_display_names
            .get(kind.key())
            .cloned()
            .unwrap_or_else(|| kind.key().to_string())
    }

    pub fn scheduled_work_days(&self, days_in_month: u32) -> u32 {
        days_in_month.saturating_sub(self.monthly_holidays)
    }
}

/// Parses `M_settings_YYYYMM.csv` rows into a `ResolvedSettings`. Unrecognized
/// or malformed keys are logged as warnings and skipped — never fatal, per
/// the configuration-warning row of the error taxonomy.
pub struct SettingsResolver;

impl SettingsResolver {
    pub fn resolve(
        rows: &[SettingRow],
        year: i32,
        month: u32,
        known_staff: &HashSet<StaffId>,
        days_in_month: u32,
    ) -> ResolvedSettings {
        let monthly_key = format!("MONTHLY_HOLIDAYS_{:04}{:02}", year, month);

        let mut monthly_holidays = DEFAULT_MONTHLY_HOLIDAYS;
        let mut max_consecutive_work_days = DEFAULT_MAX_CONSECUTIVE_WORK_DAYS;
        let mut shift_display_names = HashMap::new();
        let mut pre_assignments = Vec::new();

        for row in rows {
            let key = row.setting_id.trim();
            if key == monthly_key {
                match row.value.trim().parse::<u32>() {
                    Ok(v) => monthly_holidays = v,
                    Err(_) => warn!(key, value = %row.value, "MONTHLY_HOLIDAYS value is not an integer, ignoring"),
                }
            } else if key == "MAX_CONSECUTIVE_WORK_DAYS" {
                match row.value.trim().parse::<u32>() {
                    Ok(v) => max_consecutive_work_days = v,
                    Err(_) => warn!(key, value = %row.value, "MAX_CONSECUTIVE_WORK_DAYS value is not an integer, ignoring"),
                }
            } else if let Some(shift_key) = parse_shift_name_key(key) {
                shift_display_names.insert(shift_key.to_string(), row.value.clone());
            } else if key.starts_with("ASSIGN_") {
                match parse_pre_assignment(key, &row.value, year, month, known_staff, days_in_month) {
                    Ok(pre_assignment) => pre_assignments.push(pre_assignment),
                    Err(reason) => warn!(key, value = %row.value, reason, "skipping malformed pre-assignment"),
                }
            } else {
                warn!(key, "unrecognized setting key, ignoring");
            }
        }

        ResolvedSettings {
            monthly_holidays,
            max_consecutive_work_days,
            shift_display_names,
            pre_assignments,
        }
    }
}

fn parse_shift_name_key(key: &str) -> Option<&str> {
    key.strip_prefix("SHIFT_")?.strip_suffix("_NAME")
}

fn parse_pre_assignment(
    key: &str,
    value: &str,
    year: i32,
    month: u32,
    known_staff: &HashSet<StaffId>,
    days_in_month: u32,
) -> Result<PreAssignment, &'static str> {
    let body = key.strip_prefix("ASSIGN_").ok_or("missing ASSIGN_ prefix")?;
    let (id_part, date_part) = body.rsplit_once('_').ok_or("missing staff/date separator")?;

    if id_part.is_empty() {
        return Err("empty staff id");
    }
    let staff_id = StaffId::from(id_part);
    if !known_staff.contains(&staff_id) {
        return Err("unknown staff id");
    }

    let date = parse_yyyymmdd(date_part).ok_or("unparseable date")?;
    if date.year() != year || date.month() != month {
        return Err("date outside target month");
    }
    if date.day() > days_in_month {
        return Err("day out of range for month");
    }

    let shift = ShiftKind::from_key(value).ok_or("unrecognized shift key")?;

    Ok(PreAssignment { staff_id, date, shift })
}

fn parse_yyyymmdd(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = s[0..4].parse().ok()?;
    let month: u32 = s[4..6].parse().ok()?;
    let day: u32 = s[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(ids: &[&str]) -> HashSet<StaffId> {
        ids.iter().map(|s| StaffId::from(*s)).collect()
    }

    fn row(setting_id: &str, value: &str) -> SettingRow {
        SettingRow {
            setting_id: setting_id.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn defaults_apply_when_keys_absent() {
        let resolved = SettingsResolver::resolve(&[], 2026, 7, &staff(&[]), 31);
        assert_eq!(resolved.monthly_holidays, DEFAULT_MONTHLY_HOLIDAYS);
        assert_eq!(
            resolved.max_consecutive_work_days,
            DEFAULT_MAX_CONSECUTIVE_WORK_DAYS
        );
        assert!(resolved.pre_assignments.is_empty());
    }

    #[test]
    fn monthly_holidays_only_matches_current_run() {
        let rows = vec![
            row("MONTHLY_HOLIDAYS_202607", "11"),
            row("MONTHLY_HOLIDAYS_202608", "99"),
        ];
        let resolved = SettingsResolver::resolve(&rows, 2026, 7, &staff(&[]), 31);
        assert_eq!(resolved.monthly_holidays, 11);
    }

    #[test]
    fn shift_name_override_is_applied() {
        let rows = vec![row("SHIFT_NIGHT_NAME", "Night Duty")];
        let resolved = SettingsResolver::resolve(&rows, 2026, 7, &staff(&[]), 31);
        assert_eq!(resolved.shift_display_name(ShiftKind::Night), "Night Duty");
        assert_eq!(resolved.shift_display_name(ShiftKind::Day), "DAY");
    }

    #[test]
    fn valid_pre_assignment_is_parsed() {
        let rows = vec![row("ASSIGN_007_20260715", "NIGHT")];
        let resolved = SettingsResolver::resolve(&rows, 2026, 7, &staff(&["007"]), 31);
        assert_eq!(resolved.pre_assignments.len(), 1);
        let pa = &resolved.pre_assignments[0];
        assert_eq!(pa.staff_id, StaffId::from("007"));
        assert_eq!(pa.shift, ShiftKind::Night);
    }

    #[test]
    fn pre_assignment_with_unknown_staff_is_skipped() {
        let rows = vec![row("ASSIGN_999_20260715", "NIGHT")];
        let resolved = SettingsResolver::resolve(&rows, 2026, 7, &staff(&["007"]), 31);
        assert!(resolved.pre_assignments.is_empty());
    }

    #[test]
    fn pre_assignment_outside_target_month_is_skipped() {
        let rows = vec![row("ASSIGN_007_20260815", "NIGHT")];
        let resolved = SettingsResolver::resolve(&rows, 2026, 7, &staff(&["007"]), 31);
        assert!(resolved.pre_assignments.is_empty());
    }

    #[test]
    fn pre_assignment_with_unrecognized_shift_is_skipped() {
        let rows = vec![row("ASSIGN_007_20260715", "AFTERNOON")];
        let resolved = SettingsResolver::resolve(&rows, 2026, 7, &staff(&["007"]), 31);
        assert!(resolved.pre_assignments.is_empty());
    }
}
