use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::quotes::{CreateQuoteRequest, QuoteRequestList, UpdateQuoteStatusRequest},
    entity::{
        products::{self, Entity as Products},
        quote_requests::{
            self, ActiveModel as QuoteActive, Column as QuoteCol, Entity as QuoteRequests,
            Relation as QuoteRelation,
        },
        suppliers::Entity as Suppliers,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{QuoteRequest, Role},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, QuoteListQuery},
    services::supplier_service,
    state::AppState,
    workflow::QuoteStatus,
};

async fn paginate(
    state: &AppState,
    finder: Select<QuoteRequests>,
    query: &QuoteListQuery,
) -> AppResult<ApiResponse<QuoteRequestList>> {
    let (page, limit, offset) = Pagination::new(query.page, query.limit).normalize();
    let finder = match query.status {
        Some(status) => finder.filter(QuoteCol::Status.eq(status)),
        None => finder,
    }
    .order_by_desc(QuoteCol::CreatedAt)
    .order_by_asc(QuoteCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(QuoteRequest::from)
        .collect();

    Ok(ApiResponse::success(
        "Quote requests",
        QuoteRequestList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// Loads a quote request together with the product it targets.
async fn quote_with_product(
    state: &AppState,
    id: Uuid,
) -> AppResult<(quote_requests::Model, products::Model)> {
    let found = QuoteRequests::find_by_id(id)
        .find_also_related(Products)
        .one(&state.orm)
        .await?;
    match found {
        Some((quote, Some(product))) => Ok((quote, product)),
        Some((_, None)) | None => Err(AppError::NotFound),
    }
}

/// True when `user` is the seller whose supplier owns `product`.
async fn owns_product(
    state: &AppState,
    user: &AuthUser,
    product: &products::Model,
) -> AppResult<bool> {
    if user.role != Role::Seller {
        return Ok(false);
    }
    let supplier = Suppliers::find_by_id(product.supplier_id)
        .one(&state.orm)
        .await?;
    Ok(supplier.is_some_and(|s| s.user_id == user.user_id))
}

pub async fn create_quote_request(
    state: &AppState,
    user: &AuthUser,
    payload: CreateQuoteRequest,
) -> AppResult<ApiResponse<QuoteRequest>> {
    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?;
    if product.is_none() {
        return Err(AppError::NotFound);
    }

    let now = Utc::now();
    let quote = QuoteActive {
        id: Set(Uuid::new_v4()),
        product_id: Set(payload.product_id),
        user_id: Set(user.user_id),
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        company: Set(payload.company),
        quantity: Set(payload.quantity),
        message: Set(payload.message),
        status: Set(QuoteStatus::Pending),
        response_message: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(quote_id = %quote.id, product_id = %quote.product_id, "quote request created");
    audit::record(
        state,
        Some(user.user_id),
        "quote_create",
        "quote_requests",
        serde_json::json!({ "quote_id": quote.id, "product_id": quote.product_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote request submitted",
        QuoteRequest::from(quote),
        Some(Meta::empty()),
    ))
}

pub async fn list_my_quote_requests(
    state: &AppState,
    user: &AuthUser,
    query: QuoteListQuery,
) -> AppResult<ApiResponse<QuoteRequestList>> {
    let finder = QuoteRequests::find().filter(QuoteCol::UserId.eq(user.user_id));
    paginate(state, finder, &query).await
}

pub async fn list_received_quote_requests(
    state: &AppState,
    user: &AuthUser,
    query: QuoteListQuery,
) -> AppResult<ApiResponse<QuoteRequestList>> {
    let supplier = supplier_service::supplier_for_user(state, user.user_id).await?;
    let finder = QuoteRequests::find()
        .join(JoinType::InnerJoin, QuoteRelation::Products.def())
        .filter(products::Column::SupplierId.eq(supplier.id));
    paginate(state, finder, &query).await
}

pub async fn get_quote_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<QuoteRequest>> {
    let (quote, product) = quote_with_product(state, id).await?;
    if quote.user_id != user.user_id && !owns_product(state, user, &product).await? {
        return Err(AppError::forbidden("Quote request is not visible to this account"));
    }
    Ok(ApiResponse::success(
        "OK",
        QuoteRequest::from(quote),
        Some(Meta::empty()),
    ))
}

pub async fn update_quote_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateQuoteStatusRequest,
) -> AppResult<ApiResponse<QuoteRequest>> {
    let (quote, product) = quote_with_product(state, id).await?;
    if !owns_product(state, user, &product).await? {
        return Err(AppError::forbidden(
            "Only the product's seller can update this quote request",
        ));
    }

    let from = quote.status;
    let next = from.advance_to(payload.status)?;

    let mut active: QuoteActive = quote.into();
    active.status = Set(next);
    if let Some(response_message) = payload.response_message {
        active.response_message = Set(Some(response_message));
    }
    active.updated_at = Set(Utc::now().into());

    // Guard on the old status so a concurrent update cannot be overwritten.
    let updated = QuoteRequests::update(active)
        .filter(Condition::all().add(QuoteCol::Status.eq(from)))
        .exec(&state.orm)
        .await
        .map_err(|err| match err {
            sea_orm::DbErr::RecordNotUpdated => {
                AppError::Conflict("Quote request was updated concurrently".into())
            }
            other => AppError::OrmError(other),
        })?;

    audit::record(
        state,
        Some(user.user_id),
        "quote_status_update",
        "quote_requests",
        serde_json::json!({
            "quote_id": updated.id,
            "from": from.as_ref(),
            "to": updated.status.as_ref(),
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Quote request updated",
        QuoteRequest::from(updated),
        Some(Meta::empty()),
    ))
}

pub async fn delete_quote_request(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let quote = QuoteRequests::find_by_id(id).one(&state.orm).await?;
    let quote = match quote {
        Some(q) => q,
        None => return Err(AppError::NotFound),
    };

    if quote.user_id != user.user_id {
        return Err(AppError::forbidden("Only the requester can delete a quote request"));
    }
    if quote.status != QuoteStatus::Pending {
        return Err(AppError::BadRequest(
            "Only pending quote requests can be deleted".into(),
        ));
    }

    let result = QuoteRequests::delete_many()
        .filter(
            Condition::all()
                .add(QuoteCol::Id.eq(id))
                .add(QuoteCol::Status.eq(QuoteStatus::Pending)),
        )
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::Conflict(
            "Quote request is no longer pending".into(),
        ));
    }

    audit::record(
        state,
        Some(user.user_id),
        "quote_delete",
        "quote_requests",
        serde_json::json!({ "quote_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
