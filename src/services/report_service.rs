use crate::{
    error::{AppError, AppResult},
    models::{CustomerSummary, OrderSummary, TrendPoint},
    repository::report_repo,
    response::ApiResponse,
    routes::params::{CustomerSummaryQuery, OrderSummaryQuery, OrderTrendQuery},
    state::AppState,
};

const MAX_TREND_DAYS: i64 = 366;

pub async fn order_summary(
    state: &AppState,
    query: OrderSummaryQuery,
) -> AppResult<ApiResponse<OrderSummary>> {
    if let (Some(start), Some(end)) = (query.start, query.end) {
        if end < start {
            return Err(AppError::BadRequest("end must not be before start".into()));
        }
    }

    let summary = report_repo::order_summary(
        &state.pool,
        query.outlet_id,
        query.start,
        query.end,
        state.config.report_tz_offset_hours,
    )
    .await?;

    Ok(ApiResponse::ok(summary))
}

pub async fn order_trend(
    state: &AppState,
    query: OrderTrendQuery,
) -> AppResult<ApiResponse<Vec<TrendPoint>>> {
    let (Some(start), Some(end)) = (query.start, query.end) else {
        return Err(AppError::BadRequest("start and end are required".into()));
    };
    if end < start {
        return Err(AppError::BadRequest("end must not be before start".into()));
    }
    // Bounds the series the database has to generate.
    if (end - start).num_days() > MAX_TREND_DAYS {
        return Err(AppError::BadRequest(format!(
            "date range must not exceed {MAX_TREND_DAYS} days"
        )));
    }

    let points = report_repo::order_trend(
        &state.pool,
        query.outlet_id,
        start,
        end,
        query.granularity,
        state.config.report_tz_offset_hours,
    )
    .await?;

    Ok(ApiResponse::ok(points))
}

pub async fn customer_summary(
    state: &AppState,
    query: CustomerSummaryQuery,
) -> AppResult<ApiResponse<CustomerSummary>> {
    let summary = report_repo::customer_summary(
        &state.pool,
        query.outlet_id,
        state.config.report_tz_offset_hours,
    )
    .await?;

    Ok(ApiResponse::ok(summary))
}
