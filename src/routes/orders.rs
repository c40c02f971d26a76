use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, PayOrderRequest, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Order, OrderFull, OrderWithCustomer},
    response::{ApiResponse, Attachment},
    routes::params::ListOrderQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/export", get(export_orders))
        // Invoice numbers contain slashes, so the tail is a wildcard.
        .route("/invoice/{*invoice}", get(get_order_by_invoice))
        .route("/{id}", get(get_order))
        .route("/{id}/status", put(update_order_status))
        .route("/{id}/pay", post(pay_order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Create order", body = ApiResponse<OrderFull>),
        (status = 400, description = "Unknown service in details"),
        (status = 404, description = "Outlet, customer or perfume not found"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderFull>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("keyword" = Option<String>, Query, description = "Matches invoice number, customer name or phone"),
        ("outlet_id" = Option<Uuid>, Query, description = "Restrict to one outlet"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("paid" = Option<bool>, Query, description = "true for paid orders, false for unpaid"),
        ("sort" = Option<String>, Query, description = "Sort field, prefix with - for descending"),
    ),
    responses(
        (status = 200, description = "List orders", body = ApiResponse<Vec<OrderWithCustomer>>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListOrderQuery>,
) -> AppResult<Json<ApiResponse<Vec<OrderWithCustomer>>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/export",
    params(
        ("keyword" = Option<String>, Query, description = "Matches invoice number, customer name or phone"),
        ("outlet_id" = Option<Uuid>, Query, description = "Restrict to one outlet"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("paid" = Option<bool>, Query, description = "true for paid orders, false for unpaid"),
    ),
    responses(
        (status = 200, description = "CSV file with the matching orders", content_type = "application/octet-stream")
    ),
    tag = "Orders"
)]
pub async fn export_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListOrderQuery>,
) -> AppResult<Attachment> {
    order_service::export_orders_csv(&state, query).await
}

#[utoipa::path(get, path = "/api/orders/invoice/{invoice}", tag = "Orders")]
pub async fn get_order_by_invoice(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(invoice): Path<String>,
) -> AppResult<Json<ApiResponse<OrderFull>>> {
    let resp = order_service::get_order_by_invoice(&state, &invoice).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/orders/{id}", tag = "Orders")]
pub async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderFull>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 404, description = "Order not found"),
        (status = 422, description = "Transition not allowed"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/pay",
    request_body = PayOrderRequest,
    responses(
        (status = 200, description = "Pay order", body = ApiResponse<Order>),
        (status = 404, description = "Order or payment method not found"),
        (status = 409, description = "Order already paid"),
    ),
    tag = "Orders"
)]
pub async fn pay_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::pay_order(&state, id, payload).await?;
    Ok(Json(resp))
}
