use serde::{Deserialize, Serialize};

use super::ids::{GroupId, StaffId};

/// One row of `M_staff_YYYYMM.csv`: a staff member as scoped into a single
/// group for a single run. `night_exempt` and `suction_qualified` feed H5/H6
/// directly — they are not derived from anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub staff_id: StaffId,
    pub group: GroupId,
    pub active: bool,
    pub night_exempt: bool,
    pub suction_qualified: bool,
}

impl StaffRecord {
    /// Inactive staff are read but excluded from every group's model —
    /// carried through so diagnostics can still report on them by name.
    pub fn is_schedulable(&self) -> bool {
        self.active
    }
}
