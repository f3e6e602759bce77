use std::path::Path;

use serde::Serialize;
use shared::{DomainError, DomainResult};

use crate::domain::Assignment;
use crate::settings::ResolvedSettings;

/// One row of `shift_result_YYYYMM.csv`, per §6's output contract.
#[derive(Debug, Serialize)]
struct ShiftResultRow {
    confirmed_id: String,
    staff_id: String,
    group: String,
    shift_name: String,
    start_date: String,
    start_time: String,
    end_date: String,
    end_time: String,
    registered_at: String,
    event_id: String,
}

pub fn write_shift_results(
    path: &Path,
    assignments: &[Assignment],
    settings: &ResolvedSettings,
) -> DomainResult<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| DomainError::ExternalServiceError(format!("cannot open {}: {e}", path.display())))?;

    for a in assignments {
        let row = ShiftResultRow {
            confirmed_id: String::new(),
            staff_id: a.staff_id.0.clone(),
            group: a.group.0.clone(),
            shift_name: settings.shift_display_name(a.shift_kind),
            start_date: a.date.to_string(),
            start_time: a.start_time.map(|t| t.to_string()).unwrap_or_default(),
            end_date: a.end_date.to_string(),
            end_time: a.end_time.map(|t| t.to_string()).unwrap_or_default(),
            registered_at: String::new(),
            event_id: String::new(),
        };
        writer
            .serialize(row)
            .map_err(|e| DomainError::ExternalServiceError(format!("cannot write row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| DomainError::ExternalServiceError(format!("cannot flush {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupId, ShiftKind, StaffId};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    #[test]
    fn writes_one_row_per_assignment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let settings =
            crate::settings::SettingsResolver::resolve(&[], 2026, 7, &HashSet::new(), 30);
        let assignments = vec![Assignment::new(
            StaffId::from("007"),
            GroupId::from("A"),
            NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            ShiftKind::Day,
        )];
        write_shift_results(&path, &assignments, &settings).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("007"));
        assert!(contents.contains("DAY"));
    }
}
