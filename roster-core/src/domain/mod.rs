pub mod assignment;
pub mod holiday;
pub mod ids;
pub mod pre_assignment;
pub mod shift;
pub mod staff;

pub use assignment::Assignment;
pub use holiday::HolidayRequest;
pub use ids::{GroupId, StaffId};
pub use pre_assignment::PreAssignment;
pub use shift::ShiftKind;
pub use staff::StaffRecord;
