//! Storage seams the advisor depends on.
//!
//! [`EmployeeDirectory`] is the identity store, [`LeaveLedger`] the relational
//! store holding leave types, balances and requests. Both are implemented by
//! [`mysql::MySqlLedger`] for production and [`memory::InMemoryLedger`] for
//! tests and local runs.

use std::future::Future;

use crate::error::LedgerError;
use crate::model::{
    AdviceLogEntry, Employee, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest,
};

pub mod memory;
pub mod mysql;

pub use memory::InMemoryLedger;
pub use mysql::MySqlLedger;

pub type LedgerResult<T> = Result<T, LedgerError>;

pub trait EmployeeDirectory: Send + Sync {
    fn get_employee(&self, id: u64) -> impl Future<Output = LedgerResult<Option<Employee>>> + Send;
}

pub trait LeaveLedger: Send + Sync {
    fn leave_type(&self, id: u64) -> impl Future<Output = LedgerResult<Option<LeaveType>>> + Send;

    fn leave_types(&self) -> impl Future<Output = LedgerResult<Vec<LeaveType>>> + Send;

    fn balance(
        &self,
        employee_id: u64,
        year: i32,
    ) -> impl Future<Output = LedgerResult<Option<LeaveBalance>>> + Send;

    /// Administrative grant. Creates the (employee, year) row or replaces its
    /// total, keeping the days already consumed.
    fn provision_balance(
        &self,
        employee_id: u64,
        year: i32,
        total_days: f64,
    ) -> impl Future<Output = LedgerResult<LeaveBalance>> + Send;

    /// Requests for one employee, newest first. `None` returns every status.
    fn requests_for(
        &self,
        employee_id: u64,
        statuses: Option<&[LeaveStatus]>,
    ) -> impl Future<Output = LedgerResult<Vec<LeaveRequest>>> + Send;

    /// Persist a pending request. Either the whole row is written or nothing is.
    fn insert_request(
        &self,
        request: NewLeaveRequest,
    ) -> impl Future<Output = LedgerResult<LeaveRequest>> + Send;

    fn record_advice(&self, entry: AdviceLogEntry) -> impl Future<Output = LedgerResult<()>> + Send;
}
