use std::collections::HashSet;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use shared::{parse_bool_like, DomainError, DomainResult};

use crate::domain::{GroupId, HolidayRequest, StaffId, StaffRecord};
use crate::settings::SettingRow;

#[derive(Debug, Deserialize)]
struct HolidayCsvRow {
    staff_id: String,
    date: String,
    priority: String,
}

#[derive(Debug, Deserialize)]
struct StaffCsvRow {
    staff_id: String,
    group: String,
    active: String,
    night_exempt: String,
    suction_qualified: String,
}

#[derive(Debug, Deserialize)]
struct SettingsCsvRow {
    setting_id: String,
    value: String,
}

fn open_reader(path: &Path) -> DomainResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .from_path(path)
        .map_err(|e| DomainError::MalformedInput(format!("cannot read {}: {e}", path.display())))
}

/// Parses `T_holiday_YYYYMM.csv`. An unparseable date or priority is a fatal
/// input error — the whole run aborts rather than silently dropping a row.
pub fn read_holidays(path: &Path) -> DomainResult<Vec<HolidayRequest>> {
    let mut reader = open_reader(path)?;
    let mut out = Vec::new();
    for result in reader.deserialize::<HolidayCsvRow>() {
        let row = result.map_err(|e| DomainError::MalformedInput(format!("holiday row: {e}")))?;
        let date = parse_date(&row.date)
            .ok_or_else(|| DomainError::MalformedInput(format!("unparseable date {:?}", row.date)))?;
        let priority: u32 = row
            .priority
            .trim()
            .parse()
            .map_err(|_| DomainError::MalformedInput(format!("unparseable priority {:?}", row.priority)))?;
        out.push(HolidayRequest {
            staff_id: StaffId::from(row.staff_id),
            date,
            priority,
        });
    }
    Ok(out)
}

/// Parses `M_staff_YYYYMM.csv`. `staff_id` must be unique in the batch.
pub fn read_staff(path: &Path) -> DomainResult<Vec<StaffRecord>> {
    let mut reader = open_reader(path)?;
    let mut out = Vec::new();
    let mut seen: HashSet<StaffId> = HashSet::new();
    for result in reader.deserialize::<StaffCsvRow>() {
        let row = result.map_err(|e| DomainError::MalformedInput(format!("staff row: {e}")))?;
        let staff_id = StaffId::from(row.staff_id);
        if !seen.insert(staff_id.clone()) {
            return Err(DomainError::MalformedInput(format!(
                "duplicate staff_id {staff_id}"
            )));
        }
        out.push(StaffRecord {
            staff_id,
            group: GroupId::from(row.group),
            active: parse_bool_like(&row.active),
            night_exempt: parse_bool_like(&row.night_exempt),
            suction_qualified: parse_bool_like(&row.suction_qualified),
        });
    }
    Ok(out)
}

/// Parses `M_settings_YYYYMM.csv` into raw key-value rows; interpretation is
/// `settings::SettingsResolver`'s job.
pub fn read_settings(path: &Path) -> DomainResult<Vec<SettingRow>> {
    let mut reader = open_reader(path)?;
    let mut out = Vec::new();
    for result in reader.deserialize::<SettingsCsvRow>() {
        let row = result.map_err(|e| DomainError::MalformedInput(format!("settings row: {e}")))?;
        out.push(SettingRow {
            setting_id: row.setting_id,
            value: row.value,
        });
    }
    Ok(out)
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parses_valid_holiday_rows() {
        let file = write_temp("staff_id,date,priority\n007,2026-07-15,1\n");
        let rows = read_holidays(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].priority, 1);
    }

    #[test]
    fn rejects_unparseable_date() {
        let file = write_temp("staff_id,date,priority\n007,not-a-date,1\n");
        assert!(read_holidays(file.path()).is_err());
    }

    #[test]
    fn staff_rows_recognize_localized_booleans() {
        let file = write_temp("staff_id,group,active,night_exempt,suction_qualified\n007,A,あり,false,有\n");
        let rows = read_staff(file.path()).unwrap();
        assert!(rows[0].active);
        assert!(!rows[0].night_exempt);
        assert!(rows[0].suction_qualified);
    }

    #[test]
    fn rejects_duplicate_staff_id() {
        let file = write_temp(
            "staff_id,group,active,night_exempt,suction_qualified\n007,A,true,false,false\n007,B,true,false,false\n",
        );
        assert!(read_staff(file.path()).is_err());
    }

    #[test]
    fn parses_settings_rows_verbatim() {
        let file = write_temp("setting_id,value\nMAX_CONSECUTIVE_WORK_DAYS,6\n");
        let rows = read_settings(file.path()).unwrap();
        assert_eq!(rows[0].setting_id, "MAX_CONSECUTIVE_WORK_DAYS");
        assert_eq!(rows[0].value, "6");
    }
}
