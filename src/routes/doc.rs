use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        orders::{CreateOrderDetail, CreateOrderRequest, PayOrderRequest, UpdateOrderStatusRequest},
        outlets::{CreateOutletRequest, UpdateOutletRequest},
        services::{CreateServiceCategoryRequest, CreateServiceRequest, UpdateServiceRequest},
    },
    models::{
        Customer, CustomerSummary, Order, OrderDetail, OrderFull, OrderStatus,
        OrderStatusHistory, OrderSummary, OrderWithCustomer, Outlet, PaymentMethod, Perfume,
        Service, ServiceCategory, ServiceWithCategory, TrendPoint, User,
    },
    response::{ApiResponse, ErrorBody, Paging},
    routes::{
        auth, customers, health, orders, outlets, params, payment_methods, perfumes, reports,
        services,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        outlets::create_outlet,
        outlets::list_outlets,
        outlets::get_outlet,
        outlets::update_outlet,
        outlets::delete_outlet,
        customers::create_customer,
        customers::list_customers,
        customers::get_customer,
        customers::update_customer,
        customers::delete_customer,
        services::create_service_category,
        services::list_service_categories,
        services::create_service,
        services::list_services,
        services::get_service,
        services::update_service,
        services::delete_service,
        perfumes::list_perfumes,
        perfumes::get_perfume,
        payment_methods::list_payment_methods,
        payment_methods::get_payment_method,
        orders::create_order,
        orders::list_orders,
        orders::export_orders,
        orders::get_order_by_invoice,
        orders::get_order,
        orders::update_order_status,
        orders::pay_order,
        reports::order_summary,
        reports::order_trend,
        reports::customer_summary
    ),
    components(
        schemas(
            User,
            Outlet,
            Customer,
            ServiceCategory,
            Service,
            ServiceWithCategory,
            Perfume,
            PaymentMethod,
            Order,
            OrderDetail,
            OrderStatusHistory,
            OrderWithCustomer,
            OrderFull,
            OrderStatus,
            OrderSummary,
            TrendPoint,
            CustomerSummary,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreateOutletRequest,
            UpdateOutletRequest,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            CreateServiceCategoryRequest,
            CreateServiceRequest,
            UpdateServiceRequest,
            CreateOrderRequest,
            CreateOrderDetail,
            UpdateOrderStatusRequest,
            PayOrderRequest,
            params::Pagination,
            params::TrendGranularity,
            health::HealthData,
            Paging,
            ErrorBody,
            ApiResponse<Outlet>,
            ApiResponse<Customer>,
            ApiResponse<OrderFull>,
            ApiResponse<OrderSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Outlets", description = "Outlet endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Services", description = "Service and category endpoints"),
        (name = "Perfumes", description = "Perfume master data"),
        (name = "Payment Methods", description = "Payment method master data"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Reports", description = "Reporting endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
