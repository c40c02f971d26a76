use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::services::{CreateServiceCategoryRequest, CreateServiceRequest, UpdateServiceRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Service, ServiceCategory, ServiceWithCategory},
    response::ApiResponse,
    routes::params::{ListServiceCategoryQuery, ListServiceQuery},
    services::catalog_service,
    state::AppState,
};

pub fn category_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_service_category))
        .route("/", get(list_service_categories))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_service))
        .route("/", get(list_services))
        .route("/{id}", get(get_service))
        .route("/{id}", put(update_service))
        .route("/{id}", delete(delete_service))
}

#[utoipa::path(
    post,
    path = "/api/service-categories",
    request_body = CreateServiceCategoryRequest,
    responses(
        (status = 200, description = "Create service category", body = ApiResponse<ServiceCategory>),
        (status = 409, description = "Category name already exists"),
    ),
    tag = "Services"
)]
pub async fn create_service_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateServiceCategoryRequest>,
) -> AppResult<Json<ApiResponse<ServiceCategory>>> {
    let resp = catalog_service::create_service_category(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/service-categories", tag = "Services")]
pub async fn list_service_categories(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListServiceCategoryQuery>,
) -> AppResult<Json<ApiResponse<Vec<ServiceCategory>>>> {
    let resp = catalog_service::list_service_categories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 200, description = "Create service", body = ApiResponse<Service>),
        (status = 404, description = "Outlet or category not found"),
    ),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<CreateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::create_service(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("keyword" = Option<String>, Query, description = "Matches service name"),
        ("outlet_id" = Option<Uuid>, Query, description = "Restrict to one outlet"),
        ("category_id" = Option<Uuid>, Query, description = "Restrict to one category"),
        ("sort" = Option<String>, Query, description = "Sort field, prefix with - for descending"),
    ),
    responses(
        (status = 200, description = "List services", body = ApiResponse<Vec<Service>>)
    ),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListServiceQuery>,
) -> AppResult<Json<ApiResponse<Vec<Service>>>> {
    let resp = catalog_service::list_services(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "Services")]
pub async fn get_service(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ServiceWithCategory>>> {
    let resp = catalog_service::get_service(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/services/{id}",
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Update service", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
    ),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::update_service(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    responses(
        (status = 200, description = "Delete service"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Service is referenced by order details"),
    ),
    tag = "Services"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = catalog_service::delete_service(&state, id).await?;
    Ok(Json(resp))
}
