use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{models::QuoteRequest, workflow::QuoteStatus};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuoteRequest {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "phone must be 7-20 characters"))]
    pub phone: String,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuoteStatusRequest {
    pub status: QuoteStatus,
    #[validate(length(max = 2000))]
    pub response_message: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct QuoteRequestList {
    #[schema(value_type = Vec<QuoteRequest>)]
    pub items: Vec<QuoteRequest>,
}
