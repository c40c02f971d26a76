use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceCategoryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateServiceRequest {
    pub outlet_id: Uuid,
    pub category_id: Uuid,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: i64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "kg".to_string()
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateServiceRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(range(min = 1, message = "price must be positive"))]
    pub price: Option<i64>,
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}
