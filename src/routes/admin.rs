use axum::{
    Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::suppliers::{RejectSupplierRequest, SupplierDetail, SupplierList},
    error::AppResult,
    extract::{QueryParams, UuidPath, ValidatedJson},
    middleware::{
        auth::AuthUser,
        capability::{Capability, require_capability},
    },
    models::Supplier,
    response::ApiResponse,
    routes::params::SupplierListQuery,
    services::supplier_service,
    state::AppState,
    workflow::SupplierAction,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers))
        .route("/suppliers/{id}", get(get_supplier))
        .route("/suppliers/{id}/approve", patch(approve_supplier))
        .route("/suppliers/{id}/reject", patch(reject_supplier))
        .route("/suppliers/{id}/block", patch(block_supplier))
        .route("/suppliers/{id}/unblock", patch(unblock_supplier))
        .route_layer(from_fn_with_state(
            Capability::ReviewSuppliers,
            require_capability,
        ))
}

#[utoipa::path(
    get,
    path = "/api/admin/suppliers",
    params(SupplierListQuery),
    responses(
        (status = 200, description = "List supplier applications (admin only)", body = ApiResponse<SupplierList>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SupplierListQuery>,
) -> AppResult<Json<ApiResponse<SupplierList>>> {
    let resp = supplier_service::list_suppliers(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier with its owning user", body = ApiResponse<SupplierDetail>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<SupplierDetail>>> {
    let resp = supplier_service::get_supplier_detail(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/suppliers/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier approved", body = ApiResponse<Supplier>),
        (status = 400, description = "Supplier cannot be approved from its current status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp =
        supplier_service::review_supplier(&state, &user, id, SupplierAction::Approve).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/suppliers/{id}/reject",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    request_body = RejectSupplierRequest,
    responses(
        (status = 200, description = "Supplier rejected", body = ApiResponse<Supplier>),
        (status = 400, description = "Missing reason or supplier is not pending"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reject_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<RejectSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let action = SupplierAction::Reject {
        reason: payload.reason,
    };
    let resp = supplier_service::review_supplier(&state, &user, id, action).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/suppliers/{id}/block",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier blocked", body = ApiResponse<Supplier>),
        (status = 400, description = "Supplier is not approved"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn block_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp =
        supplier_service::review_supplier(&state, &user, id, SupplierAction::Block).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/suppliers/{id}/unblock",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Supplier unblocked", body = ApiResponse<Supplier>),
        (status = 400, description = "Supplier is not blocked"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn unblock_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp =
        supplier_service::review_supplier(&state, &user, id, SupplierAction::Unblock).await?;
    Ok(Json(resp))
}
