use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::ids::{GroupId, StaffId};
use super::shift::ShiftKind;

/// A single solved shift, ready to be written out as a roster row.
/// `end_date` is `date` for every kind except `Night`, which spans into the
/// following calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub staff_id: StaffId,
    pub group: GroupId,
    pub date: NaiveDate,
    pub shift_kind: ShiftKind,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub end_date: NaiveDate,
}

impl Assignment {
    pub fn new(staff_id: StaffId, group: GroupId, date: NaiveDate, shift_kind: ShiftKind) -> Self {
        let (start_time, end_time) = match shift_kind.default_times() {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };
        let end_date = if shift_kind == ShiftKind::Night {
            date + Duration::days(1)
        } else {
            date
        };
        Self {
            staff_id,
            group,
            date,
            shift_kind,
            start_time,
            end_time,
            end_date,
        }
    }
}
