use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::favorites::{AddFavoriteRequest, FavoriteProductList, FavoriteStatus},
    entity::{
        favorites::{self, Column as FavoriteCol, Entity as Favorites},
        products::{Entity as Products, Relation as ProductRelation},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Favorite, Product},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

fn pair(user_id: Uuid, product_id: Uuid) -> Condition {
    Condition::all()
        .add(FavoriteCol::UserId.eq(user_id))
        .add(FavoriteCol::ProductId.eq(product_id))
}

/// Products favourited by `user_id`, most recently added first.
pub fn favorites_of(user_id: Uuid) -> Select<Products> {
    Products::find()
        .join(JoinType::InnerJoin, ProductRelation::Favorites.def())
        .filter(FavoriteCol::UserId.eq(user_id))
        .order_by_desc(FavoriteCol::CreatedAt)
        .order_by_asc(FavoriteCol::Id)
}

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FavoriteProductList>> {
    let (page, limit, offset) = pagination.normalize();

    let finder = favorites_of(user.user_id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let products = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = FavoriteProductList { items: products };
    Ok(ApiResponse::success("OK", data, Some(meta)))
}

pub async fn favorite_status(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    let existing = Favorites::find()
        .filter(pair(user.user_id, product_id))
        .one(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "OK",
        FavoriteStatus {
            product_id,
            is_favourite: existing.is_some(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn add_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: AddFavoriteRequest,
) -> AppResult<ApiResponse<Favorite>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let existing = Favorites::find()
        .filter(pair(user.user_id, payload.product_id))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Product is already in favourites".into()));
    }

    let favorite = favorites::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        product_id: Set(payload.product_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await
    .map_err(AppError::conflict_on_unique("Product is already in favourites"))?;

    audit::record(
        state,
        Some(user.user_id),
        "favorite_add",
        "favorites",
        serde_json::json!({ "product_id": payload.product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to favourites",
        Favorite::from(favorite),
        Some(Meta::empty()),
    ))
}

pub async fn remove_favorite(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Favorites::delete_many()
        .filter(pair(user.user_id, product_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        Some(user.user_id),
        "favorite_remove",
        "favorites",
        serde_json::json!({ "product_id": product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Removed from favourites",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
