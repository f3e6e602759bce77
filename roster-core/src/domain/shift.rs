use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// The five shift identities. Fixed index order (`Early=0, Day=1, Late=2,
/// Night=3, Rest=4`) is part of the contract: the model builder relies on it
/// for variable layout, and it must never change even though display names
/// are overridable per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    Early,
    Day,
    Late,
    Night,
    Rest,
}

impl ShiftKind {
    pub const COUNT: usize = 5;
    pub const ALL: [ShiftKind; 5] = [
        ShiftKind::Early,
        ShiftKind::Day,
        ShiftKind::Late,
        ShiftKind::Night,
        ShiftKind::Rest,
    ];

    /// Fixed position in the `x[s, d, k]` decision-variable layout.
    pub fn index(self) -> usize {
        match self {
            ShiftKind::Early => 0,
            ShiftKind::Day => 1,
            ShiftKind::Late => 2,
            ShiftKind::Night => 3,
            ShiftKind::Rest => 4,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }

    /// Stable identifier used to key settings overrides and pre-assignment
    /// values (`SHIFT_<KEY>_NAME`, `ASSIGN_<staff>_<date>` value).
    pub fn key(self) -> &'static str {
        match self {
            ShiftKind::Early => "EARLY",
            ShiftKind::Day => "DAY",
            ShiftKind::Late => "LATE",
            ShiftKind::Night => "NIGHT",
            ShiftKind::Rest => "REST",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_uppercase().as_str() {
            "EARLY" => Some(ShiftKind::Early),
            "DAY" => Some(ShiftKind::Day),
            "LATE" => Some(ShiftKind::Late),
            "NIGHT" => Some(ShiftKind::Night),
            "REST" => Some(ShiftKind::Rest),
            _ => None,
        }
    }

    /// Start/end time of the shift, `None` for `Rest`. `Night`'s end time
    /// falls on the following calendar day — callers deriving `end_date`
    /// must add a day whenever `self == Night`.
    pub fn default_times(self) -> Option<(NaiveTime, NaiveTime)> {
        let hm = |h, m| NaiveTime::from_hms_opt(h, m, 0).expect("valid time literal");
        match self {
            ShiftKind::Early => Some((hm(7, 0), hm(16, 0))),
            ShiftKind::Day => Some((hm(9, 0), hm(18, 0))),
            ShiftKind::Late => Some((hm(11, 0), hm(20, 0))),
            ShiftKind::Night => Some((hm(16, 0), hm(9, 0))),
            ShiftKind::Rest => None,
        }
    }
}
