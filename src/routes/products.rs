use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::AppResult,
    extract::{QueryParams, UuidPath, ValidatedJson},
    middleware::{
        auth::AuthUser,
        capability::{Capability, guarded},
    },
    models::Product,
    response::ApiResponse,
    routes::params::ProductQuery,
    services::product_service::{self, Scope},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_products).merge(guarded(Capability::ManageListings, post(create_product))),
        )
        .route(
            "/{id}",
            get(get_product).merge(guarded(
                Capability::ManageListings,
                put(update_product).merge(delete(delete_product)),
            )),
        )
        .route("/seller/{supplier_id}", get(list_supplier_products))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductQuery),
    responses(
        (status = 200, description = "List products of approved suppliers", body = ApiResponse<ProductList>),
        (status = 400, description = "Invalid filter")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query, Scope::Public).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/seller/{supplier_id}",
    params(
        ("supplier_id" = Uuid, Path, description = "Supplier ID"),
        ProductQuery
    ),
    responses(
        (status = 200, description = "List one supplier's products", body = ApiResponse<ProductList>),
        (status = 404, description = "Supplier not found")
    ),
    tag = "Products"
)]
pub async fn list_supplier_products(
    State(state): State<AppState>,
    UuidPath(supplier_id): UuidPath,
    QueryParams(query): QueryParams<ProductQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp =
        product_service::list_products(&state, query, Scope::Supplier(supplier_id)).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not an approved seller")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ApiResponse<Product>),
        (status = 403, description = "Not the owning approved seller"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::update_product(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted product", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Product belongs to another supplier"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = product_service::delete_product(&state, &user, id).await?;
    Ok(Json(resp))
}
