use sea_orm::DbErr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::outlets::{CreateOutletRequest, UpdateOutletRequest},
    error::{AppError, AppResult},
    models::Outlet,
    repository::outlet_repo::{self, NewOutlet, OutletFilter, OutletPatch},
    response::{ApiResponse, Paging},
    routes::params::{ListOutletQuery, Sort, parse_sort},
    state::AppState,
};

pub async fn create_outlet(
    state: &AppState,
    payload: CreateOutletRequest,
) -> AppResult<ApiResponse<Outlet>> {
    payload.validate()?;

    let code = match payload.code {
        Some(code) => code.to_uppercase(),
        None => generate_outlet_code(),
    };

    let outlet = outlet_repo::create(
        &state.orm,
        NewOutlet {
            name: payload.name,
            code,
            address: payload.address,
        },
    )
    .await?;

    Ok(ApiResponse::ok(Outlet::from(outlet)))
}

pub async fn list_outlets(
    state: &AppState,
    query: ListOutletQuery,
) -> AppResult<ApiResponse<Vec<Outlet>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();
    let sort = parse_sort(
        query.sort.as_deref(),
        Sort::desc("created_at"),
        outlet_repo::SORTABLE,
    );

    let filter = OutletFilter {
        keyword: query.keyword,
    };
    let (items, total) =
        outlet_repo::find_and_count(&state.orm, &filter, &sort, &pagination).await?;

    let outlets = items.into_iter().map(Outlet::from).collect();
    Ok(ApiResponse::ok_paged(
        outlets,
        Paging::new(page, per_page, total),
    ))
}

pub async fn get_outlet(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Outlet>> {
    let outlet = match outlet_repo::find_by_id(&state.orm, id).await? {
        Some(outlet) => outlet,
        None => return Err(AppError::NotFound("Outlet not found".into())),
    };
    Ok(ApiResponse::ok(Outlet::from(outlet)))
}

pub async fn update_outlet(
    state: &AppState,
    id: Uuid,
    payload: UpdateOutletRequest,
) -> AppResult<ApiResponse<Outlet>> {
    payload.validate()?;

    let patch = OutletPatch {
        name: payload.name,
        code: payload.code.map(|c| c.to_uppercase()),
        address: payload.address,
    };

    let outlet = match outlet_repo::update(&state.orm, id, patch).await {
        Ok(outlet) => outlet,
        Err(DbErr::RecordNotUpdated) => return Err(AppError::NotFound("Outlet not found".into())),
        Err(err) => return Err(err.into()),
    };

    Ok(ApiResponse::ok(Outlet::from(outlet)))
}

pub async fn delete_outlet(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let rows = outlet_repo::delete(&state.orm, id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Outlet not found".into()));
    }
    Ok(ApiResponse::ok(serde_json::json!({})))
}

fn generate_outlet_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..5].to_uppercase()
}
