use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub outlet_id: Uuid,
    pub customer_id: Uuid,
    pub perfume_id: Option<Uuid>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "order needs at least one line item"), nested)]
    pub details: Vec<CreateOrderDetail>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderDetail {
    pub service_id: Uuid,
    #[validate(range(min = 1, message = "qty must be at least 1"))]
    pub qty: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PayOrderRequest {
    pub payment_method_id: Uuid,
}
