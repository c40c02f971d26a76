use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOutletRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Short code used in invoice numbers. Generated from the outlet id
    /// when not supplied.
    #[validate(length(min = 2, max = 10, message = "code must be 2 to 10 characters"))]
    pub code: Option<String>,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOutletRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 2, max = 10, message = "code must be 2 to 10 characters"))]
    pub code: Option<String>,
    pub address: Option<String>,
}
