use sea_orm::DbErr;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::services::{CreateServiceCategoryRequest, CreateServiceRequest, UpdateServiceRequest},
    error::{AppError, AppResult},
    models::{PaymentMethod, Perfume, Service, ServiceCategory, ServiceWithCategory},
    repository::outlet_repo,
    repository::payment_method_repo,
    repository::perfume_repo,
    repository::service_repo::{self, NewService, NewServiceCategory, ServiceFilter, ServicePatch},
    response::{ApiResponse, Paging},
    routes::params::{
        ListPaymentMethodQuery, ListPerfumeQuery, ListServiceCategoryQuery, ListServiceQuery,
        Sort, parse_sort,
    },
    state::AppState,
};

pub async fn create_service_category(
    state: &AppState,
    payload: CreateServiceCategoryRequest,
) -> AppResult<ApiResponse<ServiceCategory>> {
    payload.validate()?;

    let category = service_repo::create_category(
        &state.orm,
        NewServiceCategory { name: payload.name },
    )
    .await?;

    Ok(ApiResponse::ok(ServiceCategory::from(category)))
}

pub async fn list_service_categories(
    state: &AppState,
    query: ListServiceCategoryQuery,
) -> AppResult<ApiResponse<Vec<ServiceCategory>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();

    let (items, total) =
        service_repo::find_and_count_categories(&state.orm, query.keyword.as_deref(), &pagination)
            .await?;

    let categories = items.into_iter().map(ServiceCategory::from).collect();
    Ok(ApiResponse::ok_paged(
        categories,
        Paging::new(page, per_page, total),
    ))
}

pub async fn create_service(
    state: &AppState,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    payload.validate()?;

    if outlet_repo::find_by_id(&state.orm, payload.outlet_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Outlet not found".into()));
    }
    if service_repo::find_category_by_id(&state.orm, payload.category_id)
        .await?
        .is_none()
    {
        return Err(AppError::NotFound("Service category not found".into()));
    }

    let service = service_repo::create(
        &state.orm,
        NewService {
            outlet_id: payload.outlet_id,
            category_id: payload.category_id,
            name: payload.name,
            price: payload.price,
            unit: payload.unit,
        },
    )
    .await?;

    Ok(ApiResponse::ok(Service::from(service)))
}

pub async fn list_services(
    state: &AppState,
    query: ListServiceQuery,
) -> AppResult<ApiResponse<Vec<Service>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();
    let sort = parse_sort(
        query.sort.as_deref(),
        Sort::desc("created_at"),
        service_repo::SORTABLE,
    );

    let filter = ServiceFilter {
        outlet_id: query.outlet_id,
        category_id: query.category_id,
        keyword: query.keyword,
    };
    let (items, total) =
        service_repo::find_and_count(&state.orm, &filter, &sort, &pagination).await?;

    let services = items.into_iter().map(Service::from).collect();
    Ok(ApiResponse::ok_paged(
        services,
        Paging::new(page, per_page, total),
    ))
}

pub async fn get_service(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<ServiceWithCategory>> {
    let (service, category) = match service_repo::find_by_id(&state.orm, id).await? {
        Some(found) => found,
        None => return Err(AppError::NotFound("Service not found".into())),
    };

    Ok(ApiResponse::ok(ServiceWithCategory {
        service: Service::from(service),
        category: category.map(ServiceCategory::from),
    }))
}

pub async fn update_service(
    state: &AppState,
    id: Uuid,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    payload.validate()?;

    let patch = ServicePatch {
        name: payload.name,
        price: payload.price,
        unit: payload.unit,
        category_id: payload.category_id,
    };

    let service = match service_repo::update(&state.orm, id, patch).await {
        Ok(service) => service,
        Err(DbErr::RecordNotUpdated) => {
            return Err(AppError::NotFound("Service not found".into()));
        }
        Err(err) => return Err(err.into()),
    };

    Ok(ApiResponse::ok(Service::from(service)))
}

pub async fn delete_service(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let rows = service_repo::delete(&state.orm, id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Service not found".into()));
    }
    Ok(ApiResponse::ok(serde_json::json!({})))
}

pub async fn list_perfumes(
    state: &AppState,
    query: ListPerfumeQuery,
) -> AppResult<ApiResponse<Vec<Perfume>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();

    let (items, total) =
        perfume_repo::find_and_count(&state.orm, query.keyword.as_deref(), &pagination).await?;

    let perfumes = items.into_iter().map(Perfume::from).collect();
    Ok(ApiResponse::ok_paged(
        perfumes,
        Paging::new(page, per_page, total),
    ))
}

pub async fn get_perfume(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Perfume>> {
    let perfume = match perfume_repo::find_by_id(&state.orm, id).await? {
        Some(perfume) => perfume,
        None => return Err(AppError::NotFound("Perfume not found".into())),
    };
    Ok(ApiResponse::ok(Perfume::from(perfume)))
}

pub async fn list_payment_methods(
    state: &AppState,
    query: ListPaymentMethodQuery,
) -> AppResult<ApiResponse<Vec<PaymentMethod>>> {
    let pagination = query.pagination();
    let (page, per_page, _) = pagination.normalize();

    let (items, total) =
        payment_method_repo::find_and_count(&state.orm, query.keyword.as_deref(), &pagination)
            .await?;

    let methods = items.into_iter().map(PaymentMethod::from).collect();
    Ok(ApiResponse::ok_paged(
        methods,
        Paging::new(page, per_page, total),
    ))
}

pub async fn get_payment_method(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<PaymentMethod>> {
    let method = match payment_method_repo::find_by_id(&state.orm, id).await? {
        Some(method) => method,
        None => return Err(AppError::NotFound("Payment method not found".into())),
    };
    Ok(ApiResponse::ok(PaymentMethod::from(method)))
}
