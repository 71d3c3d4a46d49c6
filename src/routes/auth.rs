use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest, ResubmitRequest, UserProfile},
    error::AppResult,
    extract::ValidatedJson,
    middleware::{
        auth::AuthUser,
        capability::{Capability, guarded},
    },
    models::Supplier,
    response::ApiResponse,
    services::auth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/resubmit", post(resubmit))
        .route("/me", guarded(Capability::Authenticated, get(me)))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register buyer or seller", body = ApiResponse<UserProfile>),
        (status = 400, description = "Validation failed or email/phone/PAN already taken"),
        (status = 403, description = "Admin accounts cannot be self-registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
    let resp = auth_service::register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login user", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Seller is not approved")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let resp = auth_service::login_user(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/auth/resubmit",
    request_body = ResubmitRequest,
    responses(
        (status = 200, description = "Rejected application moved back to pending", body = ApiResponse<Supplier>),
        (status = 400, description = "Application is not rejected"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
pub async fn resubmit(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResubmitRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = auth_service::resubmit_application(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user profile", body = ApiResponse<UserProfile>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let resp = auth_service::me(&state, &user).await?;
    Ok(Json(resp))
}
