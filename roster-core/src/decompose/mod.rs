use crate::domain::{GroupId, HolidayRequest, PreAssignment, StaffRecord};

/// One group's independent sub-problem input, ready for the model builder.
#[derive(Debug, Clone)]
pub struct GroupProblem {
    pub group: GroupId,
    pub staff: Vec<StaffRecord>,
    pub holidays: Vec<HolidayRequest>,
    pub pre_assignments: Vec<PreAssignment>,
}

/// Partitions active staff (and their holiday requests / pre-assignments) by
/// group. Groups are returned in stable `GroupId` order so downstream output
/// ordering (§4.7) is deterministic.
pub fn decompose(
    staff: &[StaffRecord],
    holidays: &[HolidayRequest],
    pre_assignments: &[PreAssignment],
) -> Vec<GroupProblem> {
    let mut group_ids: Vec<GroupId> = staff
        .iter()
        .filter(|s| s.is_schedulable())
        .map(|s| s.group.clone())
        .collect();
    group_ids.sort();
    group_ids.dedup();

    group_ids
        .into_iter()
        .map(|group| {
            let group_staff: Vec<StaffRecord> = staff
                .iter()
                .filter(|s| s.is_schedulable() && s.group == group)
                .cloned()
                .collect();
            let staff_ids: std::collections::HashSet<_> =
                group_staff.iter().map(|s| s.staff_id.clone()).collect();

            let group_holidays = holidays
                .iter()
                .filter(|h| staff_ids.contains(&h.staff_id))
                .cloned()
                .collect();
            let group_pre_assignments = pre_assignments
                .iter()
                .filter(|p| staff_ids.contains(&p.staff_id))
                .cloned()
                .collect();

            GroupProblem {
                group,
                staff: group_staff,
                holidays: group_holidays,
                pre_assignments: group_pre_assignments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ShiftKind, StaffId};
    use chrono::NaiveDate;

    fn staff(id: &str, group: &str) -> StaffRecord {
        StaffRecord {
            staff_id: StaffId::from(id),
            group: GroupId::from(group),
            active: true,
            night_exempt: false,
            suction_qualified: false,
        }
    }

    #[test]
    fn groups_are_ordered_and_deduplicated() {
        let staff = vec![staff("1", "B"), staff("2", "A"), staff("3", "B")];
        let problems = decompose(&staff, &[], &[]);
        let ids: Vec<_> = problems.iter().map(|p| p.group.0.clone()).collect();
        assert_eq!(ids, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn holiday_requests_are_scoped_to_their_group() {
        let staff = vec![staff("1", "A"), staff("2", "B")];
        let holidays = vec![HolidayRequest {
            staff_id: StaffId::from("1"),
            date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            priority: 1,
        }];
        let problems = decompose(&staff, &holidays, &[]);
        let group_a = problems.iter().find(|p| p.group.0 == "A").unwrap();
        let group_b = problems.iter().find(|p| p.group.0 == "B").unwrap();
        assert_eq!(group_a.holidays.len(), 1);
        assert!(group_b.holidays.is_empty());
    }

    #[test]
    fn inactive_staff_are_excluded() {
        let mut inactive = staff("3", "A");
        inactive.active = false;
        let staff = vec![staff("1", "A"), inactive];
        let problems = decompose(&staff, &[], &[]);
        assert_eq!(problems.len(), 1);
        assert_eq!(problems[0].staff.len(), 1);
    }

    #[test]
    fn pre_assignments_are_scoped_to_their_group() {
        let staff = vec![staff("1", "A"), staff("2", "B")];
        let pre = vec![PreAssignment {
            staff_id: StaffId::from("2"),
            date: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            shift: ShiftKind::Night,
        }];
        let problems = decompose(&staff, &[], &pre);
        let group_b = problems.iter().find(|p| p.group.0 == "B").unwrap();
        assert_eq!(group_b.pre_assignments.len(), 1);
    }
}
