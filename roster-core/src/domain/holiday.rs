use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::StaffId;

/// One requested day off, as read from `T_holiday_request_YYYYMM.csv`.
/// `priority` is a positive integer where a lower number is a stronger
/// request; it only ever weights S1's objective term (`max(1, 33-3p)`) — no
/// priority, including `1`, is hard-pinned into the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRequest {
    pub staff_id: StaffId,
    pub date: NaiveDate,
    pub priority: u32,
}
