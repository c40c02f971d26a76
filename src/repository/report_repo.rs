use chrono::{Days, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::datetime::{fixed_offset, local_today};
use crate::models::{CustomerSummary, OrderSummary, TrendPoint};
use crate::routes::params::TrendGranularity;

// Timestamps are stored as timestamptz. `AT TIME ZONE 'UTC'` first strips
// them to naive UTC so the configured offset is the only timezone input;
// a bare `::date` cast would silently depend on the session timezone.

const ORDER_SUMMARY_SQL: &str = r#"
SELECT
    COUNT(*) FILTER (WHERE status = 'accepted') AS accepted,
    COUNT(*) FILTER (WHERE status IN ('on-process', 'waiting-pickup')) AS on_process,
    COUNT(*) FILTER (WHERE status = 'complete') AS complete,
    COALESCE(
        SUM(total_amount) FILTER (
            WHERE (paid_at AT TIME ZONE 'UTC' + make_interval(hours => $4))::date = $6
        ), 0
    )::BIGINT AS rev_yesterday,
    COALESCE(
        SUM(total_amount) FILTER (
            WHERE (paid_at AT TIME ZONE 'UTC' + make_interval(hours => $4))::date = $5
        ), 0
    )::BIGINT AS rev_today
FROM orders
WHERE ($1::uuid IS NULL OR outlet_id = $1)
  AND ($2::date IS NULL OR (created_at AT TIME ZONE 'UTC' + make_interval(hours => $4))::date >= $2)
  AND ($3::date IS NULL OR (created_at AT TIME ZONE 'UTC' + make_interval(hours => $4))::date <= $3)
"#;

const DAILY_TREND_SQL: &str = r#"
SELECT
    TO_CHAR(series.bucket, 'YYYY-MM-DD') AS date,
    COALESCE(SUM(o.total_amount), 0)::BIGINT AS total
FROM GENERATE_SERIES($2::date, $3::date, INTERVAL '1 day') AS series(bucket)
LEFT JOIN orders o
    ON o.paid_at IS NOT NULL
    AND (o.paid_at AT TIME ZONE 'UTC' + make_interval(hours => $4))::date = series.bucket::date
    AND ($1::uuid IS NULL OR o.outlet_id = $1)
GROUP BY series.bucket
ORDER BY series.bucket
"#;

const MONTHLY_TREND_SQL: &str = r#"
SELECT
    TO_CHAR(series.bucket, 'YYYY-MM') AS date,
    COALESCE(SUM(o.total_amount), 0)::BIGINT AS total
FROM GENERATE_SERIES(
    DATE_TRUNC('month', $2::date::timestamp),
    DATE_TRUNC('month', $3::date::timestamp),
    INTERVAL '1 month'
) AS series(bucket)
LEFT JOIN orders o
    ON o.paid_at IS NOT NULL
    AND DATE_TRUNC('month', o.paid_at AT TIME ZONE 'UTC' + make_interval(hours => $4)) = series.bucket
    AND ($1::uuid IS NULL OR o.outlet_id = $1)
GROUP BY series.bucket
ORDER BY series.bucket
"#;

const CUSTOMER_SUMMARY_SQL: &str = r#"
SELECT
    COUNT(*) AS total,
    COUNT(*) FILTER (
        WHERE (created_at AT TIME ZONE 'UTC' + make_interval(hours => $2))::date = $3
    ) AS new_today,
    COUNT(*) FILTER (
        WHERE DATE_TRUNC('month', created_at AT TIME ZONE 'UTC' + make_interval(hours => $2))
            = DATE_TRUNC('month', $3::date::timestamp)
    ) AS new_this_month
FROM customers
WHERE ($1::uuid IS NULL OR outlet_id = $1)
"#;

/// Status counts plus yesterday/today revenue. Aggregates over zero rows
/// still produce a single all-zero row.
pub async fn order_summary(
    pool: &PgPool,
    outlet_id: Option<Uuid>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    tz_offset_hours: i32,
) -> Result<OrderSummary, sqlx::Error> {
    let offset = fixed_offset(tz_offset_hours);
    let today = local_today(offset);
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

    sqlx::query_as::<_, OrderSummary>(ORDER_SUMMARY_SQL)
        .bind(outlet_id)
        .bind(start)
        .bind(end)
        .bind(tz_offset_hours)
        .bind(today)
        .bind(yesterday)
        .fetch_one(pool)
        .await
}

/// Paid-revenue totals for every calendar bucket in `[start, end]`.
/// The generated series left-joined to orders guarantees one row per
/// bucket even when nothing was paid in it.
pub async fn order_trend(
    pool: &PgPool,
    outlet_id: Option<Uuid>,
    start: NaiveDate,
    end: NaiveDate,
    granularity: TrendGranularity,
    tz_offset_hours: i32,
) -> Result<Vec<TrendPoint>, sqlx::Error> {
    let sql = match granularity {
        TrendGranularity::Weekly => DAILY_TREND_SQL,
        TrendGranularity::Monthly => MONTHLY_TREND_SQL,
    };

    sqlx::query_as::<_, TrendPoint>(sql)
        .bind(outlet_id)
        .bind(start)
        .bind(end)
        .bind(tz_offset_hours)
        .fetch_all(pool)
        .await
}

pub async fn customer_summary(
    pool: &PgPool,
    outlet_id: Option<Uuid>,
    tz_offset_hours: i32,
) -> Result<CustomerSummary, sqlx::Error> {
    let offset = fixed_offset(tz_offset_hours);
    let today = local_today(offset);

    sqlx::query_as::<_, CustomerSummary>(CUSTOMER_SUMMARY_SQL)
        .bind(outlet_id)
        .bind(tz_offset_hours)
        .bind(today)
        .fetch_one(pool)
        .await
}
