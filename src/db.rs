use anyhow::{Context, Result};
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::config::Config;
use crate::model::leave_type::default_catalogue;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        employee_code VARCHAR(20) NOT NULL UNIQUE,
        full_name VARCHAR(100) NOT NULL,
        department VARCHAR(50) NULL,
        position VARCHAR(50) NULL,
        hire_date DATE NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_types (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        name VARCHAR(50) NOT NULL UNIQUE,
        description VARCHAR(200) NULL,
        max_days INT UNSIGNED NULL,
        is_paid BOOLEAN NOT NULL DEFAULT FALSE,
        need_approval BOOLEAN NOT NULL DEFAULT TRUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_balances (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        employee_id BIGINT UNSIGNED NOT NULL,
        year INT NOT NULL,
        total_days DOUBLE NOT NULL,
        used_days DOUBLE NOT NULL DEFAULT 0,
        remaining_days DOUBLE NOT NULL,
        UNIQUE KEY uq_balance_employee_year (employee_id, year),
        FOREIGN KEY (employee_id) REFERENCES employees(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS leave_requests (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        employee_id BIGINT UNSIGNED NOT NULL,
        leave_type_id BIGINT UNSIGNED NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE NOT NULL,
        days INT UNSIGNED NOT NULL,
        reason TEXT NOT NULL,
        status VARCHAR(20) NOT NULL DEFAULT 'pending',
        approver_id BIGINT UNSIGNED NULL,
        ai_recommendation TEXT NULL,
        ai_recommendation_accepted BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),
        KEY idx_requests_employee_created (employee_id, created_at),
        FOREIGN KEY (employee_id) REFERENCES employees(id),
        FOREIGN KEY (leave_type_id) REFERENCES leave_types(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS advice_log (
        id BIGINT UNSIGNED PRIMARY KEY AUTO_INCREMENT,
        employee_id BIGINT UNSIGNED NOT NULL,
        message TEXT NOT NULL,
        response TEXT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

pub async fn init_db(config: &Config) -> Result<MySqlPool> {
    MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

pub async fn ensure_schema(pool: &MySqlPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("Failed to create schema")?;
    }
    Ok(())
}

/// Install the default leave-type catalogue if the table is empty.
/// Returns how many rows were inserted.
pub async fn seed_leave_types(pool: &MySqlPool) -> Result<usize> {
    let mut tx = pool.begin().await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leave_types")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let catalogue = default_catalogue();
    for seed in &catalogue {
        sqlx::query(
            r#"
            INSERT INTO leave_types (name, description, max_days, is_paid, need_approval)
            VALUES (?, ?, ?, ?, TRUE)
            "#,
        )
        .bind(seed.name)
        .bind(seed.description)
        .bind(seed.max_days)
        .bind(seed.is_paid)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to seed leave type '{}'", seed.name))?;
    }

    tx.commit().await?;
    tracing::info!(count = catalogue.len(), "seeded leave types");
    Ok(catalogue.len())
}
