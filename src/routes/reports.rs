use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CustomerSummary, OrderSummary, TrendPoint},
    response::ApiResponse,
    routes::params::{CustomerSummaryQuery, OrderSummaryQuery, OrderTrendQuery},
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders/summary", get(order_summary))
        .route("/orders/trend", get(order_trend))
        .route("/customers/summary", get(customer_summary))
}

#[utoipa::path(
    get,
    path = "/api/reports/orders/summary",
    params(
        ("outlet_id" = Option<Uuid>, Query, description = "Restrict to one outlet"),
        ("start" = Option<String>, Query, description = "Creation date lower bound, YYYY-MM-DD"),
        ("end" = Option<String>, Query, description = "Creation date upper bound, YYYY-MM-DD"),
    ),
    responses(
        (status = 200, description = "Order status counts and revenue", body = ApiResponse<OrderSummary>)
    ),
    tag = "Reports"
)]
pub async fn order_summary(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<OrderSummaryQuery>,
) -> AppResult<Json<ApiResponse<OrderSummary>>> {
    let resp = report_service::order_summary(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/orders/trend",
    params(
        ("outlet_id" = Option<Uuid>, Query, description = "Restrict to one outlet"),
        ("start" = String, Query, description = "First bucket, YYYY-MM-DD"),
        ("end" = String, Query, description = "Last bucket, YYYY-MM-DD"),
        ("granularity" = Option<String>, Query, description = "weekly for daily buckets, monthly for month buckets"),
    ),
    responses(
        (status = 200, description = "Paid revenue per bucket", body = ApiResponse<Vec<TrendPoint>>),
        (status = 400, description = "Missing or inverted date range"),
    ),
    tag = "Reports"
)]
pub async fn order_trend(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<OrderTrendQuery>,
) -> AppResult<Json<ApiResponse<Vec<TrendPoint>>>> {
    let resp = report_service::order_trend(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/customers/summary",
    params(
        ("outlet_id" = Option<Uuid>, Query, description = "Restrict to one outlet"),
    ),
    responses(
        (status = 200, description = "Customer counts", body = ApiResponse<CustomerSummary>)
    ),
    tag = "Reports"
)]
pub async fn customer_summary(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CustomerSummaryQuery>,
) -> AppResult<Json<ApiResponse<CustomerSummary>>> {
    let resp = report_service::customer_summary(&state, query).await?;
    Ok(Json(resp))
}
