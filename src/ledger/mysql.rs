use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlPool, Transaction};

use super::{EmployeeDirectory, LeaveLedger, LedgerResult};
use crate::error::LedgerError;
use crate::model::{
    AdviceLogEntry, Employee, LeaveBalance, LeaveRequest, LeaveStatus, LeaveType, NewLeaveRequest,
};

const REQUEST_COLUMNS: &str = r#"
    r.id, r.employee_id, r.leave_type_id, t.name AS leave_type_name,
    r.start_date, r.end_date, r.days, r.reason, r.status, r.approver_id,
    r.ai_recommendation, r.ai_recommendation_accepted, r.created_at
"#;

#[derive(FromRow)]
struct BalanceRow {
    employee_id: u64,
    year: i32,
    total_days: f64,
    used_days: f64,
}

impl From<BalanceRow> for LeaveBalance {
    fn from(row: BalanceRow) -> Self {
        // remaining_days is recomputed, never read back
        LeaveBalance::new(row.employee_id, row.year, row.total_days, row.used_days)
    }
}

#[derive(FromRow)]
struct RequestRow {
    id: u64,
    employee_id: u64,
    leave_type_id: u64,
    leave_type_name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    days: u32,
    reason: String,
    status: String,
    approver_id: Option<u64>,
    ai_recommendation: Option<String>,
    ai_recommendation_accepted: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<RequestRow> for LeaveRequest {
    type Error = LedgerError;

    fn try_from(row: RequestRow) -> Result<Self, Self::Error> {
        let status = LeaveStatus::from_str(&row.status).map_err(|_| {
            LedgerError::Corrupt(format!(
                "leave request {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;

        Ok(LeaveRequest {
            id: row.id,
            employee_id: row.employee_id,
            leave_type_id: row.leave_type_id,
            leave_type_name: row.leave_type_name,
            start_date: row.start_date,
            end_date: row.end_date,
            days: row.days,
            reason: row.reason,
            status,
            approver_id: row.approver_id,
            ai_recommendation: row.ai_recommendation,
            ai_recommendation_accepted: row.ai_recommendation_accepted,
            created_at: row.created_at,
        })
    }
}

/// Ledger backed by the MySQL schema created in [`crate::db::ensure_schema`].
#[derive(Clone)]
pub struct MySqlLedger {
    pool: MySqlPool,
}

impl MySqlLedger {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn fetch_request(
        tx: &mut Transaction<'_, MySql>,
        id: u64,
    ) -> LedgerResult<LeaveRequest> {
        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests r \
             JOIN leave_types t ON t.id = r.leave_type_id \
             WHERE r.id = ?"
        );
        let row = sqlx::query_as::<_, RequestRow>(&sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        row.try_into()
    }
}

impl EmployeeDirectory for MySqlLedger {
    async fn get_employee(&self, id: u64) -> LedgerResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_code, full_name, department, position, hire_date
            FROM employees
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}

impl LeaveLedger for MySqlLedger {
    async fn leave_type(&self, id: u64) -> LedgerResult<Option<LeaveType>> {
        let leave_type = sqlx::query_as::<_, LeaveType>(
            r#"
            SELECT id, name, description, max_days, is_paid, need_approval
            FROM leave_types
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(leave_type)
    }

    async fn leave_types(&self) -> LedgerResult<Vec<LeaveType>> {
        let types = sqlx::query_as::<_, LeaveType>(
            r#"
            SELECT id, name, description, max_days, is_paid, need_approval
            FROM leave_types
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    async fn balance(&self, employee_id: u64, year: i32) -> LedgerResult<Option<LeaveBalance>> {
        let row = sqlx::query_as::<_, BalanceRow>(
            r#"
            SELECT employee_id, year, total_days, used_days
            FROM leave_balances
            WHERE employee_id = ? AND year = ?
            "#,
        )
        .bind(employee_id)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(LeaveBalance::from))
    }

    async fn provision_balance(
        &self,
        employee_id: u64,
        year: i32,
        total_days: f64,
    ) -> LedgerResult<LeaveBalance> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO leave_balances (employee_id, year, total_days, used_days, remaining_days)
            VALUES (?, ?, ?, 0, ?)
            ON DUPLICATE KEY UPDATE
                total_days = VALUES(total_days),
                remaining_days = VALUES(total_days) - used_days
            "#,
        )
        .bind(employee_id)
        .bind(year)
        .bind(total_days)
        .bind(total_days)
        .execute(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, BalanceRow>(
            r#"
            SELECT employee_id, year, total_days, used_days
            FROM leave_balances
            WHERE employee_id = ? AND year = ?
            "#,
        )
        .bind(employee_id)
        .bind(year)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row.into())
    }

    async fn requests_for(
        &self,
        employee_id: u64,
        statuses: Option<&[LeaveStatus]>,
    ) -> LedgerResult<Vec<LeaveRequest>> {
        let mut where_sql = String::from(" WHERE r.employee_id = ?");
        if let Some(statuses) = statuses {
            if statuses.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; statuses.len()].join(", ");
            where_sql.push_str(&format!(" AND r.status IN ({placeholders})"));
        }

        let sql = format!(
            "SELECT {REQUEST_COLUMNS} FROM leave_requests r \
             JOIN leave_types t ON t.id = r.leave_type_id \
             {where_sql} \
             ORDER BY r.created_at DESC, r.id DESC"
        );

        let mut query = sqlx::query_as::<_, RequestRow>(&sql).bind(employee_id);
        for status in statuses.unwrap_or_default() {
            query = query.bind(status.to_string());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(LeaveRequest::try_from).collect()
    }

    async fn insert_request(&self, request: NewLeaveRequest) -> LedgerResult<LeaveRequest> {
        // Dropping `tx` on any early return rolls the insert back.
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (employee_id, leave_type_id, start_date, end_date, days, reason,
                 status, ai_recommendation, ai_recommendation_accepted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(request.leave_type_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.days)
        .bind(&request.reason)
        .bind(LeaveStatus::Pending.to_string())
        .bind(request.ai_recommendation.as_deref())
        .bind(request.recommendation_accepted())
        .execute(&mut *tx)
        .await?;

        let stored = Self::fetch_request(&mut tx, result.last_insert_id()).await?;
        tx.commit().await?;

        Ok(stored)
    }

    async fn record_advice(&self, entry: AdviceLogEntry) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO advice_log (employee_id, message, response)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(entry.employee_id)
        .bind(&entry.message)
        .bind(&entry.response)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
