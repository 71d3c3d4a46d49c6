use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::quotes::{CreateQuoteRequest, QuoteRequestList, UpdateQuoteStatusRequest},
    error::AppResult,
    extract::{QueryParams, UuidPath, ValidatedJson},
    middleware::{
        auth::AuthUser,
        capability::{Capability, guarded},
    },
    models::QuoteRequest,
    response::ApiResponse,
    routes::params::QuoteListQuery,
    services::quote_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            guarded(
                Capability::Authenticated,
                get(list_my_quote_requests).post(create_quote_request),
            ),
        )
        .route(
            "/received",
            guarded(Capability::RespondToQuotes, get(list_received_quote_requests)),
        )
        .route(
            "/{id}",
            guarded(
                Capability::Authenticated,
                get(get_quote_request).delete(delete_quote_request),
            )
            .merge(guarded(
                Capability::RespondToQuotes,
                patch(update_quote_status),
            )),
        )
}

#[utoipa::path(
    post,
    path = "/api/quote-requests",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote request submitted", body = ApiResponse<QuoteRequest>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Quote Requests"
)]
pub async fn create_quote_request(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateQuoteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<QuoteRequest>>)> {
    let resp = quote_service::create_quote_request(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/quote-requests",
    params(QuoteListQuery),
    responses(
        (status = 200, description = "Quote requests made by the caller", body = ApiResponse<QuoteRequestList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Quote Requests"
)]
pub async fn list_my_quote_requests(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<QuoteListQuery>,
) -> AppResult<Json<ApiResponse<QuoteRequestList>>> {
    let resp = quote_service::list_my_quote_requests(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/quote-requests/received",
    params(QuoteListQuery),
    responses(
        (status = 200, description = "Quote requests against the seller's products", body = ApiResponse<QuoteRequestList>),
        (status = 403, description = "Caller is not a seller")
    ),
    security(("bearer_auth" = [])),
    tag = "Quote Requests"
)]
pub async fn list_received_quote_requests(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(query): QueryParams<QuoteListQuery>,
) -> AppResult<Json<ApiResponse<QuoteRequestList>>> {
    let resp = quote_service::list_received_quote_requests(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/quote-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote request ID")
    ),
    responses(
        (status = 200, description = "Quote request", body = ApiResponse<QuoteRequest>),
        (status = 403, description = "Neither requester nor owning seller"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Quote Requests"
)]
pub async fn get_quote_request(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<QuoteRequest>>> {
    let resp = quote_service::get_quote_request(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/quote-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote request ID")
    ),
    request_body = UpdateQuoteStatusRequest,
    responses(
        (status = 200, description = "Quote status advanced", body = ApiResponse<QuoteRequest>),
        (status = 400, description = "Status cannot move backward"),
        (status = 403, description = "Not the product's seller"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Quote Requests"
)]
pub async fn update_quote_status(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
    ValidatedJson(payload): ValidatedJson<UpdateQuoteStatusRequest>,
) -> AppResult<Json<ApiResponse<QuoteRequest>>> {
    let resp = quote_service::update_quote_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/quote-requests/{id}",
    params(
        ("id" = Uuid, Path, description = "Quote request ID")
    ),
    responses(
        (status = 200, description = "Quote request deleted", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Quote request is no longer pending"),
        (status = 403, description = "Not the requester"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Quote Requests"
)]
pub async fn delete_quote_request(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(id): UuidPath,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = quote_service::delete_quote_request(&state, &user, id).await?;
    Ok(Json(resp))
}
