use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::outlets::{CreateOutletRequest, UpdateOutletRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Outlet,
    response::ApiResponse,
    routes::params::ListOutletQuery,
    services::outlet_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_outlet))
        .route("/", get(list_outlets))
        .route("/{id}", get(get_outlet))
        .route("/{id}", put(update_outlet))
        .route("/{id}", delete(delete_outlet))
}

#[utoipa::path(
    post,
    path = "/api/outlets",
    request_body = CreateOutletRequest,
    responses(
        (status = 200, description = "Create outlet", body = ApiResponse<Outlet>),
        (status = 409, description = "Outlet code already exists"),
    ),
    tag = "Outlets"
)]
pub async fn create_outlet(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateOutletRequest>,
) -> AppResult<Json<ApiResponse<Outlet>>> {
    let resp = outlet_service::create_outlet(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/outlets",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("keyword" = Option<String>, Query, description = "Matches name or code"),
        ("sort" = Option<String>, Query, description = "Sort field, prefix with - for descending"),
    ),
    responses(
        (status = 200, description = "List outlets", body = ApiResponse<Vec<Outlet>>)
    ),
    tag = "Outlets"
)]
pub async fn list_outlets(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListOutletQuery>,
) -> AppResult<Json<ApiResponse<Vec<Outlet>>>> {
    let resp = outlet_service::list_outlets(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/outlets/{id}", tag = "Outlets")]
pub async fn get_outlet(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Outlet>>> {
    let resp = outlet_service::get_outlet(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/outlets/{id}",
    request_body = UpdateOutletRequest,
    responses(
        (status = 200, description = "Update outlet", body = ApiResponse<Outlet>),
        (status = 404, description = "Outlet not found"),
    ),
    tag = "Outlets"
)]
pub async fn update_outlet(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOutletRequest>,
) -> AppResult<Json<ApiResponse<Outlet>>> {
    let resp = outlet_service::update_outlet(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/outlets/{id}",
    responses(
        (status = 200, description = "Delete outlet"),
        (status = 404, description = "Outlet not found"),
        (status = 409, description = "Outlet still has customers, services or orders"),
    ),
    tag = "Outlets"
)]
pub async fn delete_outlet(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = outlet_service::delete_outlet(&state, id).await?;
    Ok(Json(resp))
}
