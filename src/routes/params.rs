use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    workflow::{QuoteStatus, SupplierStatus},
};

pub const DEFAULT_LIMIT: i64 = 20;
pub const DEFAULT_PRODUCT_LIMIT: i64 = 12;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Default, Clone, Copy, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    /// Returns `(page, limit, offset)` using the default page size.
    pub fn normalize(&self) -> (i64, i64, i64) {
        self.normalize_with(DEFAULT_LIMIT)
    }

    pub fn normalize_with(&self, default_limit: i64) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        let offset = (page - 1).saturating_mul(limit);
        (page, limit, offset)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ProductSort {
    #[default]
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 12
    pub limit: Option<i64>,
    /// Exact category match
    pub category: Option<String>,
    /// Case-insensitive substring over name and description
    pub q: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<i64>,
    /// Inclusive upper price bound
    pub max_price: Option<i64>,
    /// newest (default), oldest, price-low, price-high
    pub sort: Option<ProductSort>,
}

impl ProductQuery {
    pub fn pagination(&self) -> (i64, i64, i64) {
        Pagination::new(self.page, self.limit).normalize_with(DEFAULT_PRODUCT_LIMIT)
    }

    pub fn validate_price_range(&self) -> Result<(), AppError> {
        if self.min_price.is_some_and(|p| p < 0) || self.max_price.is_some_and(|p| p < 0) {
            return Err(AppError::BadRequest("price bounds cannot be negative".into()));
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(AppError::BadRequest(
                    "minPrice cannot be greater than maxPrice".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplierListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Filter by application status
    pub status: Option<SupplierStatus>,
    /// Case-insensitive substring over company name
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<QuoteStatus>,
}
