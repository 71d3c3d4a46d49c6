use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::suppliers::UpdateSupplierRequest,
    models::{Role, Supplier, User},
};

/// Business profile submitted alongside a seller registration.
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct SupplierProfileRequest {
    #[validate(length(min = 1, max = 200, message = "company_name is required"))]
    pub company_name: String,
    #[validate(length(min = 5, max = 20, message = "pan must be 5-20 characters"))]
    pub pan: String,
    #[validate(length(max = 50))]
    pub vat: Option<String>,
    #[validate(length(max = 100))]
    pub turnover: Option<String>,
    #[validate(range(min = 1800, max = 2100, message = "established must be a year"))]
    pub established: Option<i32>,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "fullname is required"))]
    pub fullname: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 7, max = 20, message = "phone must be 7-20 characters"))]
    pub phone: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[validate(url(message = "profile_photo must be a URL"))]
    pub profile_photo: Option<String>,
    /// Required when `role` is `seller`.
    #[validate(nested)]
    pub supplier: Option<SupplierProfileRequest>,
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Credentials of a rejected seller plus optional corrections to the application.
#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct ResubmitRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[validate(nested)]
    pub supplier: Option<UpdateSupplierRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserProfile {
    pub user: User,
    pub supplier: Option<Supplier>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}
