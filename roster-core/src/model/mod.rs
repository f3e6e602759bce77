mod var_index;

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::info;

pub use var_index::VarIndex;

use crate::decompose::GroupProblem;
use crate::domain::{Assignment, GroupId, ShiftKind, StaffId};
use crate::settings::ResolvedSettings;
use crate::solver::backend::{SolverBackend, VarId};

/// Per-shift minimum-staffing floors (S2). `Day` drops to 0 on Sunday.
fn shift_floor(kind: ShiftKind, day: NaiveDate) -> u32 {
    match kind {
        ShiftKind::Early => 2,
        ShiftKind::Day => {
            if day.weekday() == Weekday::Sun {
                0
            } else {
                1
            }
        }
        ShiftKind::Late => 1,
        ShiftKind::Night => 1,
        ShiftKind::Rest => 0,
    }
}

fn holiday_weight(priority: u32) -> i64 {
    (33 - 3 * priority as i64).max(1)
}

/// A fully posted constraint model for one group, ready to solve. Holds
/// enough bookkeeping (`index`) to read the solution back into `Assignment`
/// rows once the backend reports a variable assignment.
pub struct BuiltModel<B: SolverBackend> {
    pub backend: B,
    pub group: GroupId,
    pub staff_ids: Vec<StaffId>,
    pub days: Vec<NaiveDate>,
    pub index: VarIndex,
}

impl<B: SolverBackend> BuiltModel<B> {
    pub fn read_assignments(&mut self) -> Vec<Assignment> {
        let mut out = Vec::with_capacity(self.staff_ids.len() * self.days.len());
        for staff_id in self.staff_ids.clone() {
            for day in self.days.clone() {
                for kind in ShiftKind::ALL {
                    if let Some(var) = self.index.get(&staff_id, day, kind) {
                        if self.backend.value(var) == 1 {
                            out.push(Assignment::new(staff_id.clone(), self.group.clone(), day, kind));
                            break;
                        }
                    }
                }
            }
        }
        out
    }
}

/// Builds the Boolean/linear model of spec §4.4 against any `SolverBackend`.
pub struct ModelBuilder;

impl ModelBuilder {
    pub fn build<B: SolverBackend>(
        mut backend: B,
        problem: &GroupProblem,
        days: &[NaiveDate],
        settings: &ResolvedSettings,
        relaxed: bool,
    ) -> BuiltModel<B> {
        let staff_ids: Vec<StaffId> = problem.staff.iter().map(|s| s.staff_id.clone()).collect();
        let days_set: HashSet<NaiveDate> = days.iter().copied().collect();
        let mut index = VarIndex::new(&staff_ids, days);

        // Decision variables x[s,d,k].
        for staff in &problem.staff {
            for &day in days {
                for kind in ShiftKind::ALL {
                    let var = backend.new_bool_var();
                    index.insert(staff.staff_id.clone(), day, kind, var);
                }
            }
        }

        // H1: exactly one kind per (staff, day).
        for staff in &problem.staff {
            for &day in days {
                let vars: Vec<VarId> = ShiftKind::ALL
                    .iter()
                    .map(|k| index.get(&staff.staff_id, day, *k).unwrap())
                    .collect();
                backend.add_exactly_one(&vars);
            }
        }

        // H2: pre-assignments.
        for pre in &problem.pre_assignments {
            if let Some(var) = index.get(&pre.staff_id, pre.date, pre.shift) {
                backend.add_linear_eq(&[(1, var)], 1);
            }
        }

        // H3: at least one Rest day in every window of `C+1` consecutive days.
        let window_len = settings.max_consecutive_work_days as usize + 1;
        if days.len() >= window_len {
            for staff in &problem.staff {
                for start in 0..=(days.len() - window_len) {
                    let rest_vars: Vec<VarId> = days[start..start + window_len]
                        .iter()
                        .map(|&day| index.get(&staff.staff_id, day, ShiftKind::Rest).unwrap())
                        .collect();
                    backend.add_linear_ge(&rest_vars.iter().map(|v| (1, *v)).collect::<Vec<_>>(), 1);
                }
            }
        }

        // H4: Late on day d forbids Early on day d+1.
        for staff in &problem.staff {
            for i in 0..days.len().saturating_sub(1) {
                let late = index.get(&staff.staff_id, days[i], ShiftKind::Late).unwrap();
                let early_next = index.get(&staff.staff_id, days[i + 1], ShiftKind::Early).unwrap();
                let not_early_next = backend.negate(early_next);
                backend.add_implication(&[late], not_early_next);
            }
        }

        // H5: Night on day d forces Rest on d+1 and d+2 (when in range).
        for staff in &problem.staff {
            for i in 0..days.len() {
                let night = index.get(&staff.staff_id, days[i], ShiftKind::Night).unwrap();
                if i + 1 < days.len() {
                    let rest_next = index.get(&staff.staff_id, days[i + 1], ShiftKind::Rest).unwrap();
                    backend.add_implication(&[night], rest_next);
                }
                if i + 2 < days.len() {
                    let rest_next2 = index.get(&staff.staff_id, days[i + 2], ShiftKind::Rest).unwrap();
                    backend.add_implication(&[night], rest_next2);
                }
            }
        }

        // H6: night-exempt staff never work Night.
        for staff in &problem.staff {
            if staff.night_exempt {
                for &day in days {
                    let night = index.get(&staff.staff_id, day, ShiftKind::Night).unwrap();
                    backend.add_linear_eq(&[(1, night)], 0);
                }
            }
        }

        // H7: true-holiday accounting.
        for staff in &problem.staff {
            let mut true_holidays = Vec::with_capacity(days.len());
            for (i, &day) in days.iter().enumerate() {
                let rest = index.get(&staff.staff_id, day, ShiftKind::Rest).unwrap();
                let true_holiday = backend.new_bool_var();
                if i == 0 {
                    // true_holiday[s,0] == x[s,0,Rest]
                    backend.add_linear_eq(&[(1, true_holiday), (-1, rest)], 0);
                } else {
                    let night_prev = index
                        .get(&staff.staff_id, days[i - 1], ShiftKind::Night)
                        .unwrap();
                    let not_night_prev = backend.negate(night_prev);
                    backend.add_implication(&[true_holiday], rest);
                    backend.add_implication(&[true_holiday], not_night_prev);
                    backend.add_implication(&[rest, not_night_prev], true_holiday);
                }
                true_holidays.push(true_holiday);
            }

            let target = settings.monthly_holidays as i64;
            let terms: Vec<(i64, VarId)> = true_holidays.iter().map(|v| (1, *v)).collect();
            if relaxed {
                backend.add_linear_ge(&terms, (target - 2).max(0));
                backend.add_linear_le(&terms, target + 2);
            } else {
                backend.add_linear_eq(&terms, target);
            }
        }

        // H8: suction-qualified presence, every day, when the group has any
        // qualified staff at all (pre-flight already warns otherwise).
        let qualified: Vec<&StaffId> = problem
            .staff
            .iter()
            .filter(|s| s.suction_qualified)
            .map(|s| &s.staff_id)
            .collect();
        if !qualified.is_empty() {
            for &day in days {
                let terms: Vec<(i64, VarId)> = qualified
                    .iter()
                    .flat_map(|staff_id| {
                        let index_ref = &index;
                        ShiftKind::ALL
                            .iter()
                            .filter(|k| **k != ShiftKind::Rest)
                            .map(move |k| (1, index_ref.get(staff_id, day, *k).unwrap()))
                            .collect::<Vec<_>>()
                    })
                    .collect();
                backend.add_linear_ge(&terms, 1);
            }
        }

        let mut objective_terms: Vec<(i64, VarId)> = Vec::new();

        // S1: holiday requests.
        for request in &problem.holidays {
            if !days_set.contains(&request.date) {
                continue;
            }
            if let Some(rest) = index.get(&request.staff_id, request.date, ShiftKind::Rest) {
                let miss = backend.negate(rest);
                objective_terms.push((holiday_weight(request.priority), miss));
            }
        }

        // S2: minimum staffing floors with slack.
        for &day in days {
            for kind in [ShiftKind::Early, ShiftKind::Day, ShiftKind::Late, ShiftKind::Night] {
                let floor = shift_floor(kind, day) as i64;
                let slack = backend.new_int_var(0, floor);
                let mut terms: Vec<(i64, VarId)> = problem
                    .staff
                    .iter()
                    .map(|staff| (1, index.get(&staff.staff_id, day, kind).unwrap()))
                    .collect();
                terms.push((1, slack));
                backend.add_linear_ge(&terms, floor);
                objective_terms.push((50, slack));
            }
        }

        // S3: night fairness among night-eligible staff.
        let night_eligible: Vec<&StaffId> = problem
            .staff
            .iter()
            .filter(|s| !s.night_exempt)
            .map(|s| &s.staff_id)
            .collect();
        if night_eligible.len() > 1 {
            let mut night_count_vars = Vec::with_capacity(night_eligible.len());
            for staff_id in &night_eligible {
                let nights = backend.new_int_var(0, days.len() as i64);
                let mut terms: Vec<(i64, VarId)> = days
                    .iter()
                    .map(|&day| (1, index.get(staff_id, day, ShiftKind::Night).unwrap()))
                    .collect();
                terms.push((-1, nights));
                backend.add_linear_eq(&terms, 0);
                night_count_vars.push(nights);
            }
            let max_nights = backend.max_of(&night_count_vars);
            let min_nights = backend.min_of(&night_count_vars);
            let spread = backend.new_int_var(0, days.len() as i64);
            backend.add_linear_eq(&[(1, spread), (-1, max_nights), (1, min_nights)], 0);
            objective_terms.push((10, spread));
        }

        backend.set_objective_minimize(&objective_terms);

        info!(
            group = %problem.group,
            staff = problem.staff.len(),
            days = days.len(),
            relaxed,
            "model built"
        );

        BuiltModel {
            backend,
            group: problem.group.clone(),
            staff_ids,
            days: days.to_vec(),
            index,
        }
    }
}
