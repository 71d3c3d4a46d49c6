use axum::{
    Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    routing::get,
};

use crate::{
    dto::suppliers::UpdateSupplierRequest,
    error::AppResult,
    extract::ValidatedJson,
    middleware::{
        auth::AuthUser,
        capability::{Capability, require_capability},
    },
    models::Supplier,
    response::ApiResponse,
    services::supplier_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(my_supplier).put(update_my_supplier))
        .route_layer(from_fn_with_state(
            Capability::ManageSupplierProfile,
            require_capability,
        ))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/me",
    responses(
        (status = 200, description = "The caller's supplier profile", body = ApiResponse<Supplier>),
        (status = 403, description = "Caller is not a seller"),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn my_supplier(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = supplier_service::my_supplier(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/me",
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Supplier profile updated", body = ApiResponse<Supplier>),
        (status = 400, description = "Validation failed"),
        (status = 403, description = "Caller is not a seller"),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn update_my_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<UpdateSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = supplier_service::update_my_supplier(&state, &user, payload).await?;
    Ok(Json(resp))
}
