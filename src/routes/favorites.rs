use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::favorites::{AddFavoriteRequest, FavoriteProductList, FavoriteStatus},
    error::AppResult,
    extract::{QueryParams, UuidPath, ValidatedJson},
    middleware::{
        auth::AuthUser,
        capability::{Capability, require_capability},
    },
    models::Favorite,
    response::ApiResponse,
    routes::params::Pagination,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites).post(add_favorite))
        .route("/{product_id}", get(favorite_status).delete(remove_favorite))
        .route_layer(from_fn_with_state(
            Capability::Authenticated,
            require_capability,
        ))
}

#[utoipa::path(
    get,
    path = "/api/favourites",
    params(Pagination),
    responses(
        (status = 200, description = "List favourite products", body = ApiResponse<FavoriteProductList>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Favourites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(pagination): QueryParams<Pagination>,
) -> AppResult<Json<ApiResponse<FavoriteProductList>>> {
    let resp = favorite_service::list_favorites(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favourites",
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Added to favourites", body = ApiResponse<Favorite>),
        (status = 400, description = "Already in favourites"),
        (status = 404, description = "Product not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favourites"
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    ValidatedJson(payload): ValidatedJson<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Favorite>>)> {
    let resp = favorite_service::add_favorite(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/favourites/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Whether the product is a favourite", body = ApiResponse<FavoriteStatus>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favourites"
)]
pub async fn favorite_status(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(product_id): UuidPath,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let resp = favorite_service::favorite_status(&state, &user, product_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/favourites/{product_id}",
    params(
        ("product_id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Removed from favourites", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Favourite not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Favourites"
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    UuidPath(product_id): UuidPath,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = favorite_service::remove_favorite(&state, &user, product_id).await?;
    Ok(Json(resp))
}
