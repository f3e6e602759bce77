use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::StaffId;
use super::shift::ShiftKind;

/// A fixed assignment supplied by the settings table (`ASSIGN_<staff>_<date>`
/// keys), pinned into the model before solving rather than left to the
/// solver to choose. Nothing upstream de-duplicates these: two conflicting
/// `ASSIGN_` rows for the same staff/date both reach H2 and pin contradictory
/// values onto the same decision variable, which the solver reports back as
/// `INFEASIBLE` for that group rather than resolving or rejecting either row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAssignment {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub shift: ShiftKind,
}
