use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod customers;
pub mod doc;
pub mod health;
pub mod orders;
pub mod outlets;
pub mod params;
pub mod payment_methods;
pub mod perfumes;
pub mod reports;
pub mod services;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/outlets", outlets::router())
        .nest("/customers", customers::router())
        .nest("/service-categories", services::category_router())
        .nest("/services", services::router())
        .nest("/perfumes", perfumes::router())
        .nest("/payment-methods", payment_methods::router())
        .nest("/orders", orders::router())
        .nest("/reports", reports::router())
}
