use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{GroupId, HolidayRequest, StaffRecord};

/// Severity of a pre-flight finding. Pre-flight never blocks — every finding
/// is advisory and the pipeline proceeds regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    pub severity: Severity,
    pub category: String,
    pub message: String,
    pub details: String,
    pub group: Option<GroupId>,
}

impl DiagnosticEntry {
    fn error(category: &str, group: Option<GroupId>, message: String, details: String) -> Self {
        Self {
            severity: Severity::Error,
            category: category.to_string(),
            message,
            details,
            group,
        }
    }

    fn warning(category: &str, group: Option<GroupId>, message: String, details: String) -> Self {
        Self {
            severity: Severity::Warning,
            category: category.to_string(),
            message,
            details,
            group,
        }
    }
}

/// Default per-shift minimum-staffing floors used by the headcount heuristic
/// (Early=2, Day=1, Late=1, Night=1).
const DEFAULT_SHIFT_FLOORS: [u32; 4] = [2, 1, 1, 1];

/// Runs every heuristic of spec §4.2 over the whole staff roster and holiday
/// request set, without ever constructing a solver model. Always returns —
/// feasibility concerns surface here only as advisory entries.
pub fn run_preflight(
    staff: &[StaffRecord],
    holidays: &[HolidayRequest],
    days_in_month: u32,
    sundays: u32,
    scheduled_work_days: u32,
) -> Vec<DiagnosticEntry> {
    let mut entries = Vec::new();

    let mut by_group: HashMap<GroupId, Vec<&StaffRecord>> = HashMap::new();
    for record in staff.iter().filter(|r| r.is_schedulable()) {
        by_group.entry(record.group.clone()).or_default().push(record);
    }

    let min_daily_staff: u32 = DEFAULT_SHIFT_FLOORS.iter().sum();
    let max_nights_per_person = scheduled_work_days / 3;
    let weekday_demand = (days_in_month.saturating_sub(sundays)) * 5;
    let sunday_demand = sundays * 4;
    let total_demand = weekday_demand + sunday_demand;

    for (group, members) in &by_group {
        let group_size = members.len() as u32;
        if group_size < min_daily_staff {
            entries.push(DiagnosticEntry::error(
                "group-headcount",
                Some(group.clone()),
                format!("group {group} has insufficient headcount"),
                format!("group_size={group_size}, required>={min_daily_staff}"),
            ));
        }

        let night_exempt_count = members.iter().filter(|m| m.night_exempt).count() as u32;
        let night_capable = group_size.saturating_sub(night_exempt_count);
        if night_capable == 0 {
            entries.push(DiagnosticEntry::error(
                "night-capacity",
                Some(group.clone()),
                format!("group {group} has no night-eligible staff"),
                "night_capable=0".to_string(),
            ));
        } else if night_capable * max_nights_per_person < days_in_month {
            let shortage = days_in_month - night_capable * max_nights_per_person;
            entries.push(DiagnosticEntry::error(
                "night-capacity",
                Some(group.clone()),
                format!("group {group} lacks night capacity for the month"),
                format!("shortage={shortage}"),
            ));
        }

        let supply: u32 = members
            .iter()
            .map(|m| {
                if m.night_exempt {
                    scheduled_work_days
                } else {
                    scheduled_work_days.saturating_sub(4) + 4
                }
            })
            .sum();
        if supply < total_demand {
            entries.push(DiagnosticEntry::warning(
                "slot-budget",
                Some(group.clone()),
                format!("group {group} may be short on total shift supply"),
                format!("supply={supply}, demand={total_demand}"),
            ));
        }

        if !members.iter().any(|m| m.suction_qualified) {
            entries.push(DiagnosticEntry::warning(
                "qualified-staff",
                Some(group.clone()),
                format!("group {group} has no suction-qualified staff"),
                "suction_qualified_count=0".to_string(),
            ));
        }
    }

    let active_staff_count = staff.iter().filter(|r| r.is_schedulable()).count() as u32;
    if active_staff_count > 0 {
        let mut requests_by_date: HashMap<NaiveDate, u32> = HashMap::new();
        for h in holidays {
            *requests_by_date.entry(h.date).or_insert(0) += 1;
        }
        for (date, count) in requests_by_date {
            if count * 100 > active_staff_count * 30 {
                entries.push(DiagnosticEntry::warning(
                    "request-concentration",
                    None,
                    format!("{date} draws holiday requests from more than 30% of active staff"),
                    format!("requests={count}, active_staff={active_staff_count}"),
                ));
            }
        }
    }

    info!(entries = entries.len(), "pre-flight diagnostic complete");
    entries
}

/// Flags a holiday request referencing staff outside the known/active set —
/// called separately since it needs the full id index, not just per-group
/// membership.
pub fn unknown_staff_warnings(
    holidays: &[HolidayRequest],
    known_active_ids: &std::collections::HashSet<crate::domain::StaffId>,
) -> Vec<DiagnosticEntry> {
    holidays
        .iter()
        .filter(|h| !known_active_ids.contains(&h.staff_id))
        .map(|h| {
            DiagnosticEntry::warning(
                "unknown-staff",
                None,
                format!("holiday request references unknown or inactive staff {}", h.staff_id),
                format!("staff_id={}, date={}", h.staff_id, h.date),
            )
        })
        .collect()
}
