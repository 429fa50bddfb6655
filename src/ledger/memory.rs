use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use super::{EmployeeDirectory, LeaveLedger, LedgerResult};
use crate::error::LedgerError;
use crate::model::leave_type::default_catalogue;
use crate::model::{
    AdviceLogEntry, Employee, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest,
};

#[derive(Default)]
struct State {
    employees: BTreeMap<u64, Employee>,
    leave_types: BTreeMap<u64, LeaveType>,
    balances: HashMap<(u64, i32), LeaveBalance>,
    requests: Vec<LeaveRequest>,
    advice: Vec<AdviceLogEntry>,
    next_request_id: u64,
    fail_next_insert: Option<String>,
    reads_unavailable: Option<String>,
    advice_unavailable: bool,
}

/// Process-local ledger. Every operation takes the lock once and never holds
/// it across an `.await`.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<State>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger pre-seeded with the default leave-type catalogue (ids from 1).
    pub fn with_default_catalogue() -> Self {
        let ledger = Self::new();
        {
            let mut state = ledger.state();
            for (idx, seed) in default_catalogue().into_iter().enumerate() {
                let id = idx as u64 + 1;
                state.leave_types.insert(
                    id,
                    LeaveType {
                        id,
                        name: seed.name.to_string(),
                        description: Some(seed.description.to_string()),
                        max_days: seed.max_days,
                        is_paid: seed.is_paid,
                        need_approval: true,
                    },
                );
            }
        }
        ledger
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_employee(&self, employee: Employee) {
        self.state().employees.insert(employee.id, employee);
    }

    /// Id of the catalogue entry with this display name.
    pub fn leave_type_id(&self, name: &str) -> Option<u64> {
        self.state()
            .leave_types
            .values()
            .find(|t| t.name == name)
            .map(|t| t.id)
    }

    /// Make the next `insert_request` fail with `reason`.
    pub fn fail_next_insert(&self, reason: impl Into<String>) {
        self.state().fail_next_insert = Some(reason.into());
    }

    /// Make every read fail with `reason` until further notice.
    pub fn fail_reads(&self, reason: impl Into<String>) {
        self.state().reads_unavailable = Some(reason.into());
    }

    /// Make every `record_advice` call fail.
    pub fn break_advice_log(&self) {
        self.state().advice_unavailable = true;
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    pub fn advice_log(&self) -> Vec<AdviceLogEntry> {
        self.state().advice.clone()
    }
}

impl State {
    fn readable(&self) -> LedgerResult<&Self> {
        match &self.reads_unavailable {
            Some(reason) => Err(LedgerError::Unavailable(reason.clone())),
            None => Ok(self),
        }
    }
}

impl EmployeeDirectory for InMemoryLedger {
    async fn get_employee(&self, id: u64) -> LedgerResult<Option<Employee>> {
        Ok(self.state().readable()?.employees.get(&id).cloned())
    }
}

impl LeaveLedger for InMemoryLedger {
    async fn leave_type(&self, id: u64) -> LedgerResult<Option<LeaveType>> {
        Ok(self.state().readable()?.leave_types.get(&id).cloned())
    }

    async fn leave_types(&self) -> LedgerResult<Vec<LeaveType>> {
        Ok(self.state().readable()?.leave_types.values().cloned().collect())
    }

    async fn balance(&self, employee_id: u64, year: i32) -> LedgerResult<Option<LeaveBalance>> {
        let state = self.state();
        Ok(state.readable()?.balances.get(&(employee_id, year)).cloned())
    }

    async fn provision_balance(
        &self,
        employee_id: u64,
        year: i32,
        total_days: f64,
    ) -> LedgerResult<LeaveBalance> {
        let mut state = self.state();
        let balance = match state.balances.get(&(employee_id, year)) {
            Some(existing) => existing.with_total(total_days),
            None => LeaveBalance::new(employee_id, year, total_days, 0.0),
        };
        state.balances.insert((employee_id, year), balance.clone());
        Ok(balance)
    }

    async fn requests_for(
        &self,
        employee_id: u64,
        statuses: Option<&[LeaveStatus]>,
    ) -> LedgerResult<Vec<LeaveRequest>> {
        let guard = self.state();
        let state = guard.readable()?;
        let mut found: Vec<LeaveRequest> = state
            .requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .filter(|r| statuses.is_none_or(|wanted| wanted.contains(&r.status)))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    async fn insert_request(&self, request: NewLeaveRequest) -> LedgerResult<LeaveRequest> {
        let mut state = self.state();

        if let Some(reason) = state.fail_next_insert.take() {
            return Err(LedgerError::Unavailable(reason));
        }

        let leave_type_name = state
            .leave_types
            .get(&request.leave_type_id)
            .map(|t| t.name.clone())
            .ok_or_else(|| {
                LedgerError::Corrupt(format!(
                    "leave_type_id {} has no leave_types row",
                    request.leave_type_id
                ))
            })?;

        state.next_request_id += 1;
        let stored = LeaveRequest {
            id: state.next_request_id,
            employee_id: request.employee_id,
            leave_type_id: request.leave_type_id,
            leave_type_name,
            start_date: request.start_date,
            end_date: request.end_date,
            days: request.days,
            ai_recommendation_accepted: request.recommendation_accepted(),
            reason: request.reason,
            status: LeaveStatus::Pending,
            approver_id: None,
            ai_recommendation: request.ai_recommendation,
            created_at: Utc::now(),
        };
        state.requests.push(stored.clone());
        Ok(stored)
    }

    async fn record_advice(&self, entry: AdviceLogEntry) -> LedgerResult<()> {
        let mut state = self.state();
        if state.advice_unavailable {
            return Err(LedgerError::Unavailable("advice_log is not writable".into()));
        }
        state.advice.push(entry);
        Ok(())
    }
}
