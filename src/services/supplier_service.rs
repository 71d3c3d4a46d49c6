use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::suppliers::{SupplierDetail, SupplierList, UpdateSupplierRequest},
    entity::{
        suppliers::{self, ActiveModel as SupplierActive, Column, Entity as Suppliers},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Supplier,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, SupplierListQuery},
    state::AppState,
    workflow::SupplierAction,
};

/// How a supplier row is located for a transition.
#[derive(Debug, Clone, Copy)]
pub enum SupplierLookup {
    Id(Uuid),
    Owner(Uuid),
}

impl SupplierLookup {
    fn condition(self) -> Condition {
        match self {
            SupplierLookup::Id(id) => Condition::all().add(Column::Id.eq(id)),
            SupplierLookup::Owner(user_id) => Condition::all().add(Column::UserId.eq(user_id)),
        }
    }
}

/// The supplier profile owned by `user_id`, or `Forbidden` when there is none.
pub async fn supplier_for_user(state: &AppState, user_id: Uuid) -> AppResult<suppliers::Model> {
    Suppliers::find()
        .filter(Column::UserId.eq(user_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::forbidden("No supplier profile for this account"))
}

/// Like [`supplier_for_user`] but also requires the supplier to be approved.
pub async fn approved_supplier_for(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<suppliers::Model> {
    let supplier = supplier_for_user(state, user.user_id).await?;
    if !supplier.status.can_sell() {
        return Err(AppError::forbidden(format!(
            "Supplier account is {}, only approved suppliers can manage listings",
            supplier.status
        )));
    }
    Ok(supplier)
}

fn apply_profile_changes(active: &mut SupplierActive, changes: UpdateSupplierRequest) {
    if let Some(company_name) = changes.company_name {
        active.company_name = Set(company_name);
    }
    if let Some(vat) = changes.vat {
        active.vat = Set(Some(vat));
    }
    if let Some(turnover) = changes.turnover {
        active.turnover = Set(Some(turnover));
    }
    if let Some(established) = changes.established {
        active.established = Set(Some(established));
    }
}

/// Applies `action` to the located supplier under a row lock.
///
/// `changes` are profile corrections persisted in the same write (used by resubmission).
pub async fn transition(
    state: &AppState,
    actor_id: Uuid,
    lookup: SupplierLookup,
    action: SupplierAction,
    changes: Option<UpdateSupplierRequest>,
) -> AppResult<Supplier> {
    let txn = state.orm.begin().await?;

    let existing = Suppliers::find()
        .filter(lookup.condition())
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let from = existing.status;
    let next = from.apply(&action)?;

    let mut active: SupplierActive = existing.into();
    active.status = Set(next.status);
    active.rejection_reason = Set(next.rejection_reason);
    active.updated_at = Set(Utc::now().into());
    if let Some(changes) = changes {
        apply_profile_changes(&mut active, changes);
    }
    let supplier = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        supplier_id = %supplier.id,
        action = action.name(),
        from = %from,
        to = %supplier.status,
        "supplier status changed"
    );
    audit::record(
        state,
        Some(actor_id),
        &format!("supplier_{}", action.name()),
        "suppliers",
        serde_json::json!({
            "supplier_id": supplier.id,
            "from": from.as_ref(),
            "to": supplier.status.as_ref(),
        }),
    )
    .await;

    Ok(supplier.into())
}

pub async fn review_supplier(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    action: SupplierAction,
) -> AppResult<ApiResponse<Supplier>> {
    let message = match &action {
        SupplierAction::Approve => "Supplier approved",
        SupplierAction::Reject { .. } => "Supplier rejected",
        SupplierAction::Block => "Supplier blocked",
        SupplierAction::Unblock => "Supplier unblocked",
        SupplierAction::Resubmit => "Application resubmitted",
    };
    let supplier = transition(state, user.user_id, SupplierLookup::Id(id), action, None).await?;
    Ok(ApiResponse::success(message, supplier, Some(Meta::empty())))
}

pub async fn list_suppliers(
    state: &AppState,
    query: SupplierListQuery,
) -> AppResult<ApiResponse<SupplierList>> {
    let (page, limit, offset) = Pagination::new(query.page, query.limit).normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(Column::Status.eq(status));
    }
    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::CompanyName).ilike(format!("%{search}%")));
    }

    let finder = Suppliers::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt)
        .order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Supplier::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Suppliers",
        SupplierList { items },
        Some(meta),
    ))
}

pub async fn get_supplier_detail(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<SupplierDetail>> {
    let found = Suppliers::find_by_id(id)
        .find_also_related(Users)
        .one(&state.orm)
        .await?;
    let (supplier, owner) = match found {
        Some((supplier, Some(owner))) => (supplier, owner),
        Some((_, None)) => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "supplier {id} has no owning user"
            )));
        }
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "Supplier found",
        SupplierDetail {
            supplier: supplier.into(),
            owner: owner.into(),
        },
        Some(Meta::empty()),
    ))
}

pub async fn my_supplier(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Supplier>> {
    let supplier = supplier_for_user(state, user.user_id).await?;
    Ok(ApiResponse::success(
        "OK",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}

pub async fn update_my_supplier(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    let existing = supplier_for_user(state, user.user_id).await?;

    let mut active: SupplierActive = existing.into();
    apply_profile_changes(&mut active, payload);
    active.updated_at = Set(Utc::now().into());
    let supplier = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "supplier_profile_update",
        "suppliers",
        serde_json::json!({ "supplier_id": supplier.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Supplier updated",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}
