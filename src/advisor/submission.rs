use chrono::NaiveDate;

use super::read_failure;
use crate::error::{AdvisorError, AdvisorResult};
use crate::ledger::{EmployeeDirectory, LeaveLedger};
use crate::model::{LeaveRequest, NewLeaveRequest};
use crate::utils::calendar::business_days;

/// A request as chosen by the caller, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitLeave {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    /// Text of the accepted recommendation, `None` when the caller chose freely.
    pub recommendation: Option<String>,
}

/// Validate and persist a pending leave request.
///
/// The chargeable day count is always recomputed here. The annual balance is
/// neither checked nor decremented; consumption belongs to approval.
pub async fn submit<L>(ledger: &L, request: SubmitLeave) -> AdvisorResult<LeaveRequest>
where
    L: EmployeeDirectory + LeaveLedger,
{
    let days = business_days(request.start_date, request.end_date)?;

    ledger
        .get_employee(request.employee_id)
        .await
        .map_err(read_failure(request.employee_id, "employee"))?
        .ok_or(AdvisorError::NotFound {
            entity: "employee",
            id: request.employee_id,
        })?;

    if ledger
        .leave_type(request.leave_type_id)
        .await
        .map_err(read_failure(request.employee_id, "leave type"))?
        .is_none()
    {
        return Err(AdvisorError::Validation(format!(
            "leave type {} does not exist",
            request.leave_type_id
        )));
    }

    let employee_id = request.employee_id;
    let leave_type_id = request.leave_type_id;

    let stored = ledger
        .insert_request(NewLeaveRequest {
            employee_id,
            leave_type_id,
            start_date: request.start_date,
            end_date: request.end_date,
            days,
            reason: request.reason,
            ai_recommendation: request.recommendation,
        })
        .await
        .map_err(|e| {
            tracing::error!(
                error = %e,
                employee_id,
                leave_type_id,
                "Failed to create leave request"
            );
            AdvisorError::Submission(e)
        })?;

    tracing::info!(
        request_id = stored.id,
        employee_id,
        leave_type_id,
        days,
        recommendation_accepted = stored.ai_recommendation_accepted,
        "leave request submitted"
    );

    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use crate::model::{Employee, LeaveStatus};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ledger() -> InMemoryLedger {
        let ledger = InMemoryLedger::with_default_catalogue();
        ledger.add_employee(Employee {
            id: 1,
            employee_code: "EMP-001".into(),
            full_name: "Sam Okafor".into(),
            department: None,
            position: None,
            hire_date: None,
        });
        ledger
    }

    fn request(leave_type_id: u64) -> SubmitLeave {
        SubmitLeave {
            employee_id: 1,
            leave_type_id,
            start_date: date("2024-06-10"),
            end_date: date("2024-06-16"),
            reason: "moving house".into(),
            recommendation: None,
        }
    }

    #[tokio::test]
    async fn stores_pending_request_with_computed_days() {
        let ledger = ledger();
        let stored = submit(&ledger, request(3)).await.unwrap();

        assert_eq!(stored.status, LeaveStatus::Pending);
        assert_eq!(stored.days, 5);
        assert!(!stored.ai_recommendation_accepted);
        assert_eq!(stored.ai_recommendation, None);
    }

    #[tokio::test]
    async fn recommendation_text_marks_acceptance() {
        let ledger = ledger();
        let mut req = request(1);
        req.recommendation = Some("Annual leave plan".into());

        let stored = submit(&ledger, req).await.unwrap();
        assert!(stored.ai_recommendation_accepted);
        assert_eq!(stored.ai_recommendation.as_deref(), Some("Annual leave plan"));
    }

    #[tokio::test]
    async fn unknown_leave_type_is_a_validation_error_and_writes_nothing() {
        let ledger = ledger();
        let err = submit(&ledger, request(99)).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(_)));
        assert_eq!(ledger.request_count(), 0);
    }

    #[tokio::test]
    async fn unknown_employee_is_not_found() {
        let ledger = ledger();
        let mut req = request(1);
        req.employee_id = 2;
        let err = submit(&ledger, req).await.unwrap_err();
        assert!(matches!(err, AdvisorError::NotFound { entity: "employee", id: 2 }));
    }

    #[tokio::test]
    async fn reversed_range_is_rejected_before_any_lookup() {
        let ledger = ledger();
        let mut req = request(99);
        req.start_date = date("2024-06-20");
        let err = submit(&ledger, req).await.unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn ledger_failure_is_a_retryable_submission_error() {
        let ledger = ledger();
        ledger.fail_next_insert("lock wait timeout");

        let err = submit(&ledger, request(1)).await.unwrap_err();
        assert!(matches!(err, AdvisorError::Submission(_)));
        assert!(err.is_retryable());
        assert_eq!(ledger.request_count(), 0);
    }

    #[tokio::test]
    async fn balance_is_left_untouched() {
        let ledger = ledger();
        ledger.provision_balance(1, 2024, 3.0).await.unwrap();

        // 5 chargeable days against 3 remaining still goes through
        submit(&ledger, request(1)).await.unwrap();

        let balance = ledger.balance(1, 2024).await.unwrap().unwrap();
        assert_eq!(balance.used_days(), 0.0);
        assert_eq!(balance.remaining_days(), 3.0);
    }
}
