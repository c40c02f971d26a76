use sea_orm::DbErr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::customers::{CreateCustomerRequest, UpdateCustomerRequest},
    error::{AppError, AppResult},
    models::Customer,
    repository::customer_repo::{self, CustomerFilter, CustomerPatch, NewCustomer},
    repository::outlet_repo,
    response::{ApiResponse, Paging},
    routes::params::{ListCustomerQuery, Sort, parse_sort},
    state::AppState,
};

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;

    if outlet_repo::find_by_id(&state.orm, payload.outlet_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Outlet not found".into()));
    }

    let customer = customer_repo::create(
        &state.orm,
        NewCustomer {
            outlet_id: payload.outlet_id,
            name: payload.name,
            phone_number: payload.phone_number,
            address: payload.address,
        },
    )
    .await?;

    Ok(ApiResponse::ok(Customer::from(customer)))
}

pub async fn list_customers(
    state: &AppState,
    query: ListCustomerQuery,
) -> AppResult<ApiResponse<Vec<Customer>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();
    let sort = parse_sort(
        query.sort.as_deref(),
        Sort::desc("created_at"),
        customer_repo::SORTABLE,
    );

    let filter = CustomerFilter {
        outlet_id: query.outlet_id,
        keyword: query.keyword,
    };
    let (items, total) =
        customer_repo::find_and_count(&state.orm, &filter, &sort, &pagination).await?;

    let customers = items.into_iter().map(Customer::from).collect();
    Ok(ApiResponse::ok_paged(
        customers,
        Paging::new(page, per_page, total),
    ))
}

pub async fn get_customer(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Customer>> {
    let customer = match customer_repo::find_by_id(&state.orm, id).await? {
        Some(customer) => customer,
        None => return Err(AppError::NotFound("Customer not found".into())),
    };
    Ok(ApiResponse::ok(Customer::from(customer)))
}

pub async fn update_customer(
    state: &AppState,
    id: Uuid,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;

    let patch = CustomerPatch {
        name: payload.name,
        phone_number: payload.phone_number,
        address: payload.address,
    };

    let customer = match customer_repo::update(&state.orm, id, patch).await {
        Ok(customer) => customer,
        Err(DbErr::RecordNotUpdated) => {
            return Err(AppError::NotFound("Customer not found".into()));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(ApiResponse::ok(Customer::from(customer)))
}

pub async fn delete_customer(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let rows = customer_repo::delete(&state.orm, id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Customer not found".into()));
    }
    Ok(ApiResponse::ok(serde_json::json!({})))
}
