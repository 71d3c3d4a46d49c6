use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Supplier, User};

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 200))]
    pub company_name: Option<String>,
    #[validate(length(max = 50))]
    pub vat: Option<String>,
    #[validate(length(max = 100))]
    pub turnover: Option<String>,
    #[validate(range(min = 1800, max = 2100))]
    pub established: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RejectSupplierRequest {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub reason: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SupplierDetail {
    pub supplier: Supplier,
    pub owner: User,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct SupplierList {
    #[schema(value_type = Vec<Supplier>)]
    pub items: Vec<Supplier>,
}
