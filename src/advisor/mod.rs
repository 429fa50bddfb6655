//! Recommendation and submission entry points.
//!
//! [`LeaveAdvisor`] is what a transport layer holds on to. It takes ISO date
//! strings, assembles the employee profile, ranks candidate leave types and
//! persists the one the caller picks.

use anyhow::Context;
use chrono::{Datelike, Utc};

use crate::config::Config;
use crate::db;
use crate::error::{AdvisorError, AdvisorResult, LedgerError};
use crate::ledger::{EmployeeDirectory, LeaveLedger, MySqlLedger};
use crate::model::{AdviceLogEntry, LeaveRequest, LeaveType};
use crate::policy::{HandbookRetriever, PolicyKnowledgeBase, PolicyRetriever};
use crate::utils::calendar::parse_iso_date;

pub mod profile;
pub mod ranker;
pub mod submission;

pub use profile::{EmployeeProfile, build_profile};
pub use ranker::{
    RecommendationCandidate, RecommendationResult, RecommendationTier, RequestSummary, rank,
};
pub use submission::{SubmitLeave, submit};

/// Log a failed ledger read and wrap it as [`AdvisorError::Storage`].
pub(crate) fn read_failure(
    employee_id: u64,
    what: &'static str,
) -> impl FnOnce(LedgerError) -> AdvisorError {
    move |e| {
        tracing::warn!(error = %e, employee_id, what, "ledger read failed");
        AdvisorError::Storage(e)
    }
}

/// Calendar year used for balance lookups when none is given.
pub fn current_year() -> i32 {
    Utc::now().year()
}

pub struct LeaveAdvisor<L, R> {
    ledger: L,
    knowledge: PolicyKnowledgeBase<R>,
}

impl LeaveAdvisor<MySqlLedger, HandbookRetriever> {
    /// Connect to MySQL, make sure the schema and leave-type catalogue exist,
    /// and warm the policy cache.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = db::init_db(config).await?;
        db::ensure_schema(&pool).await?;
        db::seed_leave_types(&pool).await?;

        let ledger = MySqlLedger::new(pool);
        let names: Vec<String> = ledger
            .leave_types()
            .await
            .context("Failed to load leave types")?
            .into_iter()
            .map(|t| t.name)
            .collect();

        let knowledge = PolicyKnowledgeBase::from_config(HandbookRetriever::default(), config);
        knowledge.warmup(names.iter().map(String::as_str)).await;

        Ok(Self::new(ledger, knowledge))
    }
}

impl<L, R> LeaveAdvisor<L, R>
where
    L: EmployeeDirectory + LeaveLedger,
    R: PolicyRetriever,
{
    pub fn new(ledger: L, knowledge: PolicyKnowledgeBase<R>) -> Self {
        Self { ledger, knowledge }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn knowledge(&self) -> &PolicyKnowledgeBase<R> {
        &self.knowledge
    }

    pub async fn recommend(
        &self,
        employee_id: u64,
        start_date: &str,
        end_date: &str,
        reason: &str,
    ) -> AdvisorResult<RecommendationResult> {
        self.recommend_for_year(employee_id, start_date, end_date, reason, current_year())
            .await
    }

    /// Like [`LeaveAdvisor::recommend`], with the balance year given explicitly.
    pub async fn recommend_for_year(
        &self,
        employee_id: u64,
        start_date: &str,
        end_date: &str,
        reason: &str,
        year: i32,
    ) -> AdvisorResult<RecommendationResult> {
        let start = parse_iso_date("start_date", start_date)?;
        let end = parse_iso_date("end_date", end_date)?;

        let profile = build_profile(&self.ledger, employee_id, year).await?;
        let mut result = rank(profile, start, end, reason)?;

        for candidate in &mut result.recommendations {
            candidate.policy_notes = self.knowledge.snippets_for(&candidate.leave_type).await;
        }

        self.log_advice(employee_id, &result).await;
        Ok(result)
    }

    /// Best-effort audit record; a failure here never fails the recommendation.
    async fn log_advice(&self, employee_id: u64, result: &RecommendationResult) {
        let summary = &result.leave_request;
        let response = match serde_json::to_string(&result.recommendations) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    employee_id,
                    "could not serialize recommendations for advice log"
                );
                return;
            }
        };

        let entry = AdviceLogEntry {
            employee_id,
            message: format!(
                "{} to {} ({} days): {}",
                summary.start_date, summary.end_date, summary.days, summary.reason
            ),
            response,
        };

        if let Err(e) = self.ledger.record_advice(entry).await {
            tracing::warn!(error = %e, employee_id, "Failed to record advice log");
        }
    }

    pub async fn submit(
        &self,
        employee_id: u64,
        leave_type_id: u64,
        start_date: &str,
        end_date: &str,
        reason: &str,
        recommendation: Option<&str>,
    ) -> AdvisorResult<LeaveRequest> {
        let request = SubmitLeave {
            employee_id,
            leave_type_id,
            start_date: parse_iso_date("start_date", start_date)?,
            end_date: parse_iso_date("end_date", end_date)?,
            reason: reason.to_string(),
            recommendation: recommendation.map(str::to_string),
        };
        submit(&self.ledger, request).await
    }

    /// Every request of the employee, newest first.
    pub async fn list_requests(&self, employee_id: u64) -> AdvisorResult<Vec<LeaveRequest>> {
        self.ledger
            .requests_for(employee_id, None)
            .await
            .map_err(read_failure(employee_id, "leave requests"))
    }

    pub async fn leave_types(&self) -> AdvisorResult<Vec<LeaveType>> {
        self.ledger.leave_types().await.map_err(|e| {
            tracing::warn!(error = %e, "ledger read failed: leave types");
            AdvisorError::Storage(e)
        })
    }

    /// Release cached policy text. The advisor stays usable afterwards.
    pub fn shutdown(&self) {
        self.knowledge.shutdown();
        tracing::info!("leave advisor shut down");
    }
}
