use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{ShiftKind, StaffId};
use crate::solver::backend::VarId;

/// Maps `(staff, day, kind)` to the backend's native variable handle.
#[derive(Debug, Default)]
pub struct VarIndex {
    map: HashMap<(StaffId, NaiveDate, ShiftKind), VarId>,
}

impl VarIndex {
    pub fn new(_staff_ids: &[StaffId], _days: &[NaiveDate]) -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, staff_id: StaffId, day: NaiveDate, kind: ShiftKind, var: VarId) {
        self.map.insert((staff_id, day, kind), var);
    }

    pub fn get(&self, staff_id: &StaffId, day: NaiveDate, kind: ShiftKind) -> Option<VarId> {
        self.map.get(&(staff_id.clone(), day, kind)).copied()
    }
}
