use serde::Serialize;

use super::read_failure;
use crate::error::{AdvisorError, AdvisorResult};
use crate::ledger::{EmployeeDirectory, LeaveLedger};
use crate::model::{Employee, LeaveBalance, LeaveRequest, LeaveStatus};

/// Read-only snapshot of an employee used for one recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeProfile {
    pub employee: Employee,
    pub year: i32,
    /// `None` means no balance was provisioned for `year`, which is not the
    /// same as a balance with zero days left.
    pub balance: Option<LeaveBalance>,
    /// Pending and approved requests, newest first. Informational only.
    pub leave_history: Vec<LeaveRequest>,
}

impl EmployeeProfile {
    pub fn has_balance(&self) -> bool {
        self.balance.is_some()
    }
}

pub async fn build_profile<L>(
    ledger: &L,
    employee_id: u64,
    year: i32,
) -> AdvisorResult<EmployeeProfile>
where
    L: EmployeeDirectory + LeaveLedger,
{
    let employee = ledger
        .get_employee(employee_id)
        .await
        .map_err(read_failure(employee_id, "employee"))?
        .ok_or(AdvisorError::NotFound {
            entity: "employee",
            id: employee_id,
        })?;

    let balance = ledger
        .balance(employee_id, year)
        .await
        .map_err(read_failure(employee_id, "leave balance"))?;

    let leave_history = ledger
        .requests_for(employee_id, Some(LeaveStatus::ACTIVE.as_slice()))
        .await
        .map_err(read_failure(employee_id, "leave history"))?;

    tracing::debug!(
        employee_id,
        year,
        has_balance = balance.is_some(),
        history = leave_history.len(),
        "assembled employee profile"
    );

    Ok(EmployeeProfile {
        employee,
        year,
        balance,
        leave_history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::model::NewLeaveRequest;
    use chrono::NaiveDate;

    fn employee(id: u64) -> Employee {
        Employee {
            id,
            employee_code: format!("EMP-{id:03}"),
            full_name: "Lin Wei".into(),
            department: Some("Engineering".into()),
            position: None,
            hire_date: NaiveDate::from_ymd_opt(2019, 3, 1),
        }
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let ledger = InMemoryLedger::with_default_catalogue();
        let err = build_profile(&ledger, 404, 2024).await.unwrap_err();
        assert!(matches!(
            err,
            AdvisorError::NotFound {
                entity: "employee",
                id: 404
            }
        ));
    }

    #[tokio::test]
    async fn missing_balance_stays_absent() {
        let ledger = InMemoryLedger::with_default_catalogue();
        ledger.add_employee(employee(1));
        ledger.provision_balance(1, 2023, 10.0).await.unwrap();

        let profile = build_profile(&ledger, 1, 2024).await.unwrap();
        assert!(!profile.has_balance());
        assert!(profile.leave_history.is_empty());
    }

    #[tokio::test]
    async fn zero_balance_is_still_present() {
        let ledger = InMemoryLedger::with_default_catalogue();
        ledger.add_employee(employee(1));
        ledger.provision_balance(1, 2024, 0.0).await.unwrap();

        let profile = build_profile(&ledger, 1, 2024).await.unwrap();
        let balance = profile.balance.expect("provisioned");
        assert_eq!(balance.remaining_days(), 0.0);
    }

    #[tokio::test]
    async fn history_holds_active_requests() {
        let ledger = InMemoryLedger::with_default_catalogue();
        ledger.add_employee(employee(1));
        ledger
            .insert_request(NewLeaveRequest {
                employee_id: 1,
                leave_type_id: 1,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                days: 1,
                reason: "dentist".into(),
                ai_recommendation: None,
            })
            .await
            .unwrap();

        let profile = build_profile(&ledger, 1, 2024).await.unwrap();
        assert_eq!(profile.leave_history.len(), 1);
        assert_eq!(profile.leave_history[0].status, LeaveStatus::Pending);
    }
}
