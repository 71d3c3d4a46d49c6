use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::{favorites, products, quote_requests, suppliers, users},
    workflow::{QuoteStatus, SupplierStatus},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    ToSchema,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Role {
    #[default]
    #[sea_orm(string_value = "buyer")]
    Buyer,
    #[sea_orm(string_value = "seller")]
    Seller,
    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            fullname: model.fullname,
            email: model.email,
            phone: model.phone,
            role: model.role,
            profile_photo: model.profile_photo,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Supplier {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub pan: String,
    pub vat: Option<String>,
    pub turnover: Option<String>,
    pub established: Option<i32>,
    pub status: SupplierStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<suppliers::Model> for Supplier {
    fn from(model: suppliers::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            company_name: model.company_name,
            pan: model.pan,
            vat: model.vat,
            turnover: model.turnover,
            established: model.established,
            status: model.status,
            rejection_reason: model.rejection_reason,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub price: i64,
    pub quantity: i32,
    pub margin_percentage: f64,
    /// Wholesale price marked up by `margin_percentage`.
    pub retail_price: f64,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn retail_price(price: i64, margin_percentage: f64) -> f64 {
    let retail = price as f64 * (1.0 + margin_percentage / 100.0);
    (retail * 100.0).round() / 100.0
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            supplier_id: model.supplier_id,
            retail_price: retail_price(model.price, model.margin_percentage),
            name: model.name,
            description: model.description,
            category: model.category,
            price: model.price,
            quantity: model.quantity,
            margin_percentage: model.margin_percentage,
            image: model.image,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteRequest {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: Option<String>,
    pub quantity: i32,
    pub message: Option<String>,
    pub status: QuoteStatus,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<quote_requests::Model> for QuoteRequest {
    fn from(model: quote_requests::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            company: model.company,
            quantity: model.quantity,
            message: model.message,
            status: model.status,
            response_message: model.response_message,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Favorite {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<favorites::Model> for Favorite {
    fn from(model: favorites::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            user_id: model.user_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
