use serde::{Deserialize, Serialize};

use crate::domain::GroupId;
use crate::preflight::DiagnosticEntry;
use crate::solver::{FailureReason, GroupOutcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResult {
    pub success: bool,
    pub message: String,
    pub details: String,
    pub relaxed_success: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOrWarning {
    pub category: String,
    pub message: String,
    pub details: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiagnosticReport {
    pub errors: Vec<ErrorOrWarning>,
    pub warnings: Vec<ErrorOrWarning>,
    pub group_results: std::collections::BTreeMap<String, GroupResult>,
    pub staff_issues: Vec<ErrorOrWarning>,
    pub suggestions: Vec<String>,
}

/// Merges pre-flight findings with per-group solver outcomes into the
/// report of §6/§4.8, including the suggestion-priority heuristic for
/// failed groups: (a) no night-eligible staff, (b) undersized group, (c)
/// everything else (holiday load / borrow staff).
pub fn aggregate(
    preflight: Vec<DiagnosticEntry>,
    outcomes: Vec<(GroupId, GroupOutcome)>,
    group_sizes: &std::collections::HashMap<GroupId, usize>,
    night_capable: &std::collections::HashMap<GroupId, usize>,
) -> DiagnosticReport {
    let mut report = DiagnosticReport::default();

    for entry in preflight {
        let item = ErrorOrWarning {
            category: entry.category.clone(),
            message: entry.message.clone(),
            details: entry.details.clone(),
        };
        match entry.severity {
            crate::preflight::Severity::Error => report.errors.push(item),
            crate::preflight::Severity::Warning => {
                if entry.category == "unknown-staff" {
                    report.staff_issues.push(item);
                } else {
                    report.warnings.push(item);
                }
            }
        }
    }

    for (group, outcome) in outcomes {
        match outcome {
            GroupOutcome::Solved { relaxed, optimal, .. } => {
                report.group_results.insert(
                    group.0.clone(),
                    GroupResult {
                        success: true,
                        message: if optimal {
                            "solved optimally".to_string()
                        } else {
                            "solved (feasible, not proven optimal)".to_string()
                        },
                        details: format!("relaxed={relaxed}"),
                        relaxed_success: if relaxed { Some(true) } else { None },
                    },
                );
            }
            GroupOutcome::Failed { reason, relaxed_attempted } => {
                let message = match reason {
                    FailureReason::Infeasible => "no feasible schedule found",
                    FailureReason::Unknown => "solver did not conclude within the time budget",
                    FailureReason::ModelInvalid => "model was rejected by the solver",
                };
                report.group_results.insert(
                    group.0.clone(),
                    GroupResult {
                        success: false,
                        message: message.to_string(),
                        details: format!("relaxed_attempted={relaxed_attempted}"),
                        relaxed_success: if relaxed_attempted { Some(false) } else { None },
                    },
                );

                let capable = night_capable.get(&group).copied().unwrap_or(1);
                let size = group_sizes.get(&group).copied().unwrap_or(usize::MAX);
                let suggestion = if capable == 0 {
                    format!("group {group}: add a night-eligible staff member")
                } else if size < 5 {
                    format!("group {group}: increase headcount to at least 5")
                } else {
                    format!("group {group}: reduce holiday-request load or borrow staff from another group")
                };
                report.suggestions.push(suggestion);
            }
        }
    }

    report
}
