use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod doc;
pub mod favorites;
pub mod health;
pub mod params;
pub mod products;
pub mod quotes;
pub mod suppliers;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/admin", admin::router())
        .nest("/suppliers", suppliers::router())
        .nest("/quote-requests", quotes::router())
        .nest("/favourites", favorites::router())
}
