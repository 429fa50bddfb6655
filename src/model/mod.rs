pub mod advice;
pub mod employee;
pub mod leave_balance;
pub mod leave_request;
pub mod leave_type;

pub use advice::AdviceLogEntry;
pub use employee::Employee;
pub use leave_balance::LeaveBalance;
pub use leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};
pub use leave_type::{LeaveType, NewLeaveType};
