use chrono::NaiveDate;
use serde::Serialize;

use super::profile::EmployeeProfile;
use crate::error::AdvisorResult;
use crate::model::leave_type::{ANNUAL_LEAVE, COMPENSATORY_REST, PERSONAL_LEAVE};
use crate::policy::PolicySnippet;
use crate::utils::calendar::business_days;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecommendationTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationCandidate {
    pub plan_name: String,
    pub leave_type: String,
    pub days: u32,
    pub is_compliant: bool,
    pub impact: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub tier: RecommendationTier,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub policy_notes: Vec<PolicySnippet>,
}

impl RecommendationCandidate {
    fn new(
        leave_type: &str,
        days: u32,
        impact: &str,
        pros: &[&str],
        cons: &[&str],
        tier: RecommendationTier,
    ) -> Self {
        Self {
            plan_name: format!("{leave_type} plan"),
            leave_type: leave_type.to_string(),
            days,
            is_compliant: true,
            impact: impact.to_string(),
            pros: pros.iter().map(|s| s.to_string()).collect(),
            cons: cons.iter().map(|s| s.to_string()).collect(),
            tier,
            policy_notes: Vec::new(),
        }
    }
}

/// The request as the advisor understood it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSummary {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<RecommendationCandidate>,
    pub employee_info: EmployeeProfile,
    pub leave_request: RequestSummary,
}

/// Candidate leave-type assignments for `start..=end`.
///
/// Order is a fixed policy preference, not a score: annual leave when the
/// balance covers the request, then personal leave, then compensatory rest.
/// Every candidate carries the full day count; requests are never split.
pub fn rank(
    profile: EmployeeProfile,
    start: NaiveDate,
    end: NaiveDate,
    reason: &str,
) -> AdvisorResult<RecommendationResult> {
    let days = business_days(start, end)?;
    let mut recommendations = Vec::with_capacity(3);

    if profile.balance.as_ref().is_some_and(|b| b.covers(days)) {
        recommendations.push(RecommendationCandidate::new(
            ANNUAL_LEAVE,
            days,
            "Paid leave with no effect on performance review",
            &["Paid", "No performance impact"],
            &["Consumes annual allotment"],
            RecommendationTier::High,
        ));
    }

    recommendations.push(RecommendationCandidate::new(
        PERSONAL_LEAVE,
        days,
        "Unpaid leave that may affect performance review",
        &["Simple approval", "No proof required"],
        &["Unpaid", "May affect performance review"],
        RecommendationTier::Medium,
    ));

    recommendations.push(RecommendationCandidate::new(
        COMPENSATORY_REST,
        days,
        "Paid leave with no effect on performance review",
        &["Paid", "Does not consume annual allotment"],
        &["Requires prior overtime record", "Must be used within 3 months"],
        RecommendationTier::Medium,
    ));

    tracing::debug!(
        employee_id = profile.employee.id,
        days,
        candidates = recommendations.len(),
        "ranked leave candidates"
    );

    Ok(RecommendationResult {
        recommendations,
        employee_info: profile,
        leave_request: RequestSummary {
            start_date: start,
            end_date: end,
            days,
            reason: reason.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdvisorError;
    use crate::model::{Employee, LeaveBalance};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn profile(balance: Option<LeaveBalance>) -> EmployeeProfile {
        EmployeeProfile {
            employee: Employee {
                id: 1,
                employee_code: "EMP-001".into(),
                full_name: "Ana Souza".into(),
                department: None,
                position: None,
                hire_date: None,
            },
            year: 2024,
            balance,
            leave_history: Vec::new(),
        }
    }

    fn leave_types(result: &RecommendationResult) -> Vec<&str> {
        result
            .recommendations
            .iter()
            .map(|c| c.leave_type.as_str())
            .collect()
    }

    #[test]
    fn sufficient_balance_puts_annual_leave_first() {
        let balance = LeaveBalance::new(1, 2024, 10.0, 2.0);
        let result = rank(
            profile(Some(balance)),
            date("2024-06-10"),
            date("2024-06-14"),
            "trip",
        )
        .unwrap();

        assert_eq!(leave_types(&result), vec![ANNUAL_LEAVE, PERSONAL_LEAVE, COMPENSATORY_REST]);
        assert_eq!(result.recommendations[0].tier, RecommendationTier::High);
        assert!(result.recommendations.iter().all(|c| c.days == 5 && c.is_compliant));
    }

    #[test]
    fn exact_balance_is_enough() {
        let balance = LeaveBalance::new(1, 2024, 5.0, 0.0);
        let result = rank(
            profile(Some(balance)),
            date("2024-06-10"),
            date("2024-06-14"),
            "trip",
        )
        .unwrap();
        assert_eq!(result.recommendations.len(), 3);
    }

    #[test]
    fn short_balance_drops_annual_leave() {
        let balance = LeaveBalance::new(1, 2024, 10.0, 6.0);
        let result = rank(
            profile(Some(balance)),
            date("2024-06-10"),
            date("2024-06-14"),
            "trip",
        )
        .unwrap();
        assert_eq!(leave_types(&result), vec![PERSONAL_LEAVE, COMPENSATORY_REST]);
    }

    #[test]
    fn no_balance_drops_annual_leave() {
        let result = rank(profile(None), date("2024-06-10"), date("2024-06-10"), "errand").unwrap();
        assert_eq!(leave_types(&result), vec![PERSONAL_LEAVE, COMPENSATORY_REST]);
        assert!(result.recommendations.iter().all(|c| c.tier == RecommendationTier::Medium));
    }

    #[test]
    fn weekend_only_request_still_offers_annual_with_zero_days() {
        let balance = LeaveBalance::new(1, 2024, 0.0, 0.0);
        let result = rank(
            profile(Some(balance)),
            date("2024-06-15"),
            date("2024-06-16"),
            "move",
        )
        .unwrap();
        assert_eq!(result.leave_request.days, 0);
        assert_eq!(result.recommendations[0].leave_type, ANNUAL_LEAVE);
    }

    #[test]
    fn summary_echoes_the_request() {
        let result = rank(
            profile(None),
            date("2024-06-10"),
            date("2024-06-16"),
            "wedding",
        )
        .unwrap();
        assert_eq!(
            result.leave_request,
            RequestSummary {
                start_date: date("2024-06-10"),
                end_date: date("2024-06-16"),
                days: 5,
                reason: "wedding".into(),
            }
        );
        assert_eq!(result.employee_info.employee.id, 1);
    }

    #[test]
    fn reversed_range_fails() {
        let err = rank(profile(None), date("2024-06-14"), date("2024-06-10"), "x").unwrap_err();
        assert!(matches!(err, AdvisorError::InvalidRange { .. }));
    }

    #[test]
    fn candidates_serialize_with_lowercase_tier() {
        let result = rank(profile(None), date("2024-06-10"), date("2024-06-10"), "x").unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["recommendations"][0]["tier"], "medium");
        assert_eq!(json["recommendations"][0]["plan_name"], "Personal leave plan");
        assert!(json["recommendations"][0].get("policy_notes").is_none());
        assert_eq!(json["leave_request"]["start_date"], "2024-06-10");
    }
}
