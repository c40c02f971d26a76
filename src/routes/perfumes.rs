use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    models::Perfume,
    response::ApiResponse,
    routes::params::ListPerfumeQuery,
    services::catalog_service,
    state::AppState,
};

// Perfumes are master data seeded by migration, so the API is read only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_perfumes))
        .route("/{id}", get(get_perfume))
}

#[utoipa::path(
    get,
    path = "/api/perfumes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("keyword" = Option<String>, Query, description = "Matches perfume name"),
    ),
    responses(
        (status = 200, description = "List perfumes", body = ApiResponse<Vec<Perfume>>)
    ),
    tag = "Perfumes"
)]
pub async fn list_perfumes(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListPerfumeQuery>,
) -> AppResult<Json<ApiResponse<Vec<Perfume>>>> {
    let resp = catalog_service::list_perfumes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/api/perfumes/{id}", tag = "Perfumes")]
pub async fn get_perfume(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Perfume>>> {
    let resp = catalog_service::get_perfume(&state, id).await?;
    Ok(Json(resp))
}
