use std::str::FromStr;

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use uuid::Uuid;

use crate::models::{PaymentRecord, PaymentStatus};

/// Opens (and creates, for file URLs) the SQLite database. Tests pass
/// `sqlite::memory:`.
pub async fn init_db(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new().connect_with(options).await
}

pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Inserts a fresh `pending` record for a purchase attempt.
pub async fn create_payment(
    pool: &SqlitePool,
    user_id: &str,
    amount: i64,
    currency: &str,
    plan_name: &str,
) -> Result<PaymentRecord, sqlx::Error> {
    let record = PaymentRecord {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        amount,
        currency: currency.to_string(),
        plan_name: plan_name.to_string(),
        status: PaymentStatus::Pending,
        stripe_session_id: None,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO payments (id, user_id, amount, currency, plan_name, status, stripe_session_id, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&record.id)
    .bind(&record.user_id)
    .bind(record.amount)
    .bind(&record.currency)
    .bind(&record.plan_name)
    .bind(record.status)
    .bind(&record.stripe_session_id)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn get_payment(
    pool: &SqlitePool,
    payment_id: &str,
) -> Result<Option<PaymentRecord>, sqlx::Error> {
    sqlx::query_as::<_, PaymentRecord>(
        "SELECT id, user_id, amount, currency, plan_name, status, stripe_session_id, created_at
         FROM payments WHERE id = ?1",
    )
    .bind(payment_id)
    .fetch_optional(pool)
    .await
}

/// Success-callback transition: `completed`, storing the provider session id.
/// Last write wins; there is no idempotency guard.
pub async fn mark_completed(
    pool: &SqlitePool,
    payment_id: &str,
    stripe_session_id: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE payments SET status = ?1, stripe_session_id = ?2 WHERE id = ?3",
    )
    .bind(PaymentStatus::Completed)
    .bind(stripe_session_id)
    .bind(payment_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Cancel-callback transition: `cancelled`.
pub async fn mark_cancelled(pool: &SqlitePool, payment_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE payments SET status = ?1 WHERE id = ?2")
        .bind(PaymentStatus::Cancelled)
        .bind(payment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
