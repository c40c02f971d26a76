use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::PaymentMethod,
    response::ApiResponse,
    routes::params::ListPaymentMethodQuery,
    services::catalog_service,
    state::AppState,
};

// Payment methods are master data seeded by migration, so the API is read only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payment_methods))
        .route("/{id}", get(get_payment_method))
}

#[utoipa::path(
    get,
    path = "/api/payment-methods",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("keyword" = Option<String>, Query, description = "Matches payment method name"),
    ),
    responses(
        (status = 200, description = "List payment methods", body = ApiResponse<Vec<PaymentMethod>>)
    ),
    tag = "Payment Methods"
)]
pub async fn list_payment_methods(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListPaymentMethodQuery>,
) -> AppResult<Json<ApiResponse<Vec<PaymentMethod>>>> {
    let resp = catalog_service::list_payment_methods(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/payment-methods/{id}", tag = "Payment Methods")]
pub async fn get_payment_method(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PaymentMethod>>> {
    let resp = catalog_service::get_payment_method(&state, id).await?;
    Ok(Json(resp))
}
