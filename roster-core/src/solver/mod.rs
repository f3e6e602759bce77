pub mod backend;

use tracing::{error, info, warn};

use crate::domain::Assignment;
use crate::model::BuiltModel;
use backend::{SolveStatus, SolverBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Infeasible,
    Unknown,
    ModelInvalid,
}

#[derive(Debug, Clone)]
pub enum GroupOutcome {
    Solved {
        assignments: Vec<Assignment>,
        relaxed: bool,
        optimal: bool,
    },
    Failed {
        reason: FailureReason,
        relaxed_attempted: bool,
    },
}

/// Per spec §4.5: submits a group's model with a bounded wall-clock budget
/// and worker count, collapsing the backend's native error surface into the
/// four recognized statuses, and retrying once with a relaxed profile on
/// `INFEASIBLE`.
pub struct SolverDriver {
    pub max_time_in_seconds: u64,
    pub num_search_workers: u32,
}

impl SolverDriver {
    pub fn new(max_time_in_seconds: u64, num_search_workers: u32) -> Self {
        Self {
            max_time_in_seconds,
            num_search_workers,
        }
    }

    /// `build_standard` and `build_relaxed` each construct a fresh backend
    /// model — a solver does not support re-solving after constraints were
    /// already posted for a different profile.
    pub fn run<B, FStd, FRelaxed>(
        &self,
        build_standard: FStd,
        build_relaxed: FRelaxed,
    ) -> GroupOutcome
    where
        B: SolverBackend,
        FStd: FnOnce() -> BuiltModel<B>,
        FRelaxed: FnOnce() -> BuiltModel<B>,
    {
        let standard = build_standard();
        match self.solve_once(standard) {
            Ok((assignments, optimal)) => {
                info!("group solved under standard profile");
                GroupOutcome::Solved {
                    assignments,
                    relaxed: false,
                    optimal,
                }
            }
            Err(FailureReason::Infeasible) => {
                warn!("standard profile infeasible, retrying with relaxed profile");
                let relaxed = build_relaxed();
                match self.solve_once(relaxed) {
                    Ok((assignments, optimal)) => {
                        info!("group solved under relaxed profile");
                        GroupOutcome::Solved {
                            assignments,
                            relaxed: true,
                            optimal,
                        }
                    }
                    Err(reason) => {
                        error!(?reason, "relaxed profile also failed");
                        GroupOutcome::Failed {
                            reason,
                            relaxed_attempted: true,
                        }
                    }
                }
            }
            Err(reason) => {
                error!(?reason, "group failed, no relaxed retry for this reason");
                GroupOutcome::Failed {
                    reason,
                    relaxed_attempted: false,
                }
            }
        }
    }

    fn solve_once<B: SolverBackend>(
        &self,
        mut built: BuiltModel<B>,
    ) -> Result<(Vec<Assignment>, bool), FailureReason> {
        let status = built
            .backend
            .solve(self.max_time_in_seconds, self.num_search_workers);
        match status {
            SolveStatus::Optimal | SolveStatus::Feasible => {
                let assignments = built.read_assignments();
                Ok((assignments, status == SolveStatus::Optimal))
            }
            SolveStatus::Infeasible => Err(FailureReason::Infeasible),
            SolveStatus::Unknown => Err(FailureReason::Unknown),
        }
    }
}
