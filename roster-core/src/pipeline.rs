use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate, Weekday};
use shared::DomainResult;
use tracing::{info, info_span};

use crate::assemble::Assembler;
use crate::config::RunConfig;
use crate::decompose::{self, GroupProblem};
use crate::diagnostics::{self, DiagnosticReport};
use crate::domain::GroupId;
use crate::io::{csv_input, csv_output, json_output};
use crate::model::ModelBuilder;
use crate::notify;
use crate::preflight::{self, DiagnosticEntry};
use crate::settings::SettingsResolver;
use crate::solver::backend::SelenBackend;
use crate::solver::{GroupOutcome, SolverDriver};

/// `(year, month, resolved settings, paths)` threaded explicitly through
/// every pipeline stage, replacing ambient globals (§9 Design Note).
pub struct RunContext {
    pub year: i32,
    pub month: u32,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: RunConfig,
}

impl RunContext {
    fn input_path(&self, prefix: &str) -> PathBuf {
        self.input_dir
            .join(format!("{prefix}_{:04}{:02}.csv", self.year, self.month))
    }

    fn days_in_month(&self) -> Vec<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("valid year/month");
        let next_month_first = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        }
        .expect("valid year/month");
        let mut days = Vec::new();
        let mut cursor = first;
        while cursor < next_month_first {
            days.push(cursor);
            cursor += chrono::Duration::days(1);
        }
        days
    }
}

pub struct PipelineOutcome {
    pub exit_code: i32,
    pub report: DiagnosticReport,
}

/// Runs the full pipeline of spec §2 once, end to end: Settings Resolver →
/// Pre-flight Diagnostic → Group Decomposer → Model Builder → Solver Driver
/// → Assembler → Diagnostic Aggregator.
pub fn run(ctx: &RunContext) -> DomainResult<PipelineOutcome> {
    let _span = info_span!("pipeline", year = ctx.year, month = ctx.month).entered();

    let staff = {
        let _s = info_span!("load_staff").entered();
        csv_input::read_staff(&ctx.input_path("M_staff"))?
    };
    let holidays = {
        let _s = info_span!("load_holidays").entered();
        csv_input::read_holidays(&ctx.input_path("T_holiday"))?
    };
    let setting_rows = {
        let _s = info_span!("load_settings").entered();
        csv_input::read_settings(&ctx.input_path("M_settings"))?
    };

    let active_ids: HashSet<_> = staff
        .iter()
        .filter(|s| s.is_schedulable())
        .map(|s| s.staff_id.clone())
        .collect();

    let days = ctx.days_in_month();
    let sundays = days.iter().filter(|d| d.weekday() == Weekday::Sun).count() as u32;

    let settings = {
        let _s = info_span!("resolve_settings").entered();
        SettingsResolver::resolve(&setting_rows, ctx.year, ctx.month, &active_ids, days.len() as u32)
    };

    let scheduled_work_days = settings.scheduled_work_days(days.len() as u32);

    let mut preflight_entries: Vec<DiagnosticEntry> = {
        let _s = info_span!("preflight").entered();
        preflight::run_preflight(&staff, &holidays, days.len() as u32, sundays, scheduled_work_days)
    };
    preflight_entries.extend(preflight::unknown_staff_warnings(&holidays, &active_ids));

    let group_problems: Vec<GroupProblem> = {
        let _s = info_span!("decompose").entered();
        decompose::decompose(&staff, &holidays, &settings.pre_assignments)
    };

    let group_sizes: HashMap<GroupId, usize> = group_problems
        .iter()
        .map(|g| (g.group.clone(), g.staff.len()))
        .collect();
    let night_capable: HashMap<GroupId, usize> = group_problems
        .iter()
        .map(|g| {
            (
                g.group.clone(),
                g.staff.iter().filter(|s| !s.night_exempt).count(),
            )
        })
        .collect();

    let driver = SolverDriver::new(
        ctx.config.solver.max_time_in_seconds,
        ctx.config.solver.num_search_workers,
    );

    let mut outcomes: Vec<(GroupId, GroupOutcome)> = Vec::new();
    let mut solved_assignments = Vec::new();

    for problem in &group_problems {
        let _g = info_span!("group", group = %problem.group).entered();
        let outcome = driver.run(
            || ModelBuilder::build(SelenBackend::new(), problem, &days, &settings, false),
            || ModelBuilder::build(SelenBackend::new(), problem, &days, &settings, true),
        );

        let outcome = match outcome {
            GroupOutcome::Solved { assignments, relaxed, optimal } => {
                let expected: Vec<_> = problem
                    .staff
                    .iter()
                    .flat_map(|s| days.iter().map(move |&d| (s.staff_id.clone(), d)))
                    .collect();
                match Assembler::assert_group_invariants(&assignments, &expected) {
                    Ok(()) => {
                        solved_assignments.push(assignments.clone());
                        GroupOutcome::Solved { assignments, relaxed, optimal }
                    }
                    Err(err) => {
                        tracing::error!(group = %problem.group, %err, "discarding group: internal invariant violated");
                        GroupOutcome::Failed {
                            reason: crate::solver::FailureReason::ModelInvalid,
                            relaxed_attempted: relaxed,
                        }
                    }
                }
            }
            failed => failed,
        };

        outcomes.push((problem.group.clone(), outcome));
    }

    let (rows, _stats) = Assembler::assemble(solved_assignments);

    let any_relaxed = outcomes
        .iter()
        .any(|(_, o)| matches!(o, GroupOutcome::Solved { relaxed: true, .. }));
    let any_failed = outcomes.iter().any(|(_, o)| matches!(o, GroupOutcome::Failed { .. }));
    let any_solved = outcomes
        .iter()
        .any(|(_, o)| matches!(o, GroupOutcome::Solved { .. }));

    let report = diagnostics::aggregate(preflight_entries, outcomes, &group_sizes, &night_capable);

    std::fs::create_dir_all(&ctx.output_dir).ok();

    let mut wrote_results = false;
    if any_solved && (!any_failed || ctx.config.solver.partial_output_enabled) {
        let path = ctx
            .output_dir
            .join(format!("shift_result_{:04}{:02}.csv", ctx.year, ctx.month));
        csv_output::write_shift_results(&path, &rows, &settings)?;
        wrote_results = true;
    }

    let report_path = ctx
        .output_dir
        .join(format!("diagnostic_report_{:04}{:02}.json", ctx.year, ctx.month));
    json_output::write_diagnostic_report(&report_path, &report)?;

    let notifiable = notify::notification_permitted(any_relaxed, any_failed);
    info!(notifiable, "downstream notification gate evaluated (no notifier wired in)");

    let exit_code = if !wrote_results {
        2
    } else if !notifiable {
        1
    } else {
        0
    };

    info!(exit_code, "pipeline run complete");
    Ok(PipelineOutcome { exit_code, report })
}
