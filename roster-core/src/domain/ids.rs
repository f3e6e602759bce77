use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, stable staff identifier — the facility's own employee code, not a
/// generated UUID (see `M_staff_YYYYMM.csv`'s `staff_id` column).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StaffId(pub String);

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for StaffId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StaffId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Opaque group identifier (`M_staff_YYYYMM.csv`'s `group` column).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
