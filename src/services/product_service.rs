use chrono::Utc;
use sea_orm::sea_query::{Expr, extension::postgres::PgExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        products::{self, ActiveModel, Column, Entity as Products, Relation as ProductRelation},
        suppliers::{self, Entity as Suppliers},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSort},
    services::supplier_service,
    state::AppState,
    workflow::SupplierStatus,
};

/// Which listings a catalog query runs over.
#[derive(Debug, Clone, Copy)]
pub enum Scope {
    /// Every approved supplier's listings.
    Public,
    /// One supplier's listings, whatever its status.
    Supplier(Uuid),
}

/// Translates the catalog filters into a SeaORM condition.
pub fn filter_condition(query: &ProductQuery) -> Condition {
    let mut condition = Condition::all();

    if let Some(category) = query.category.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.clone()));
    }

    if let Some(search) = query.q.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col((Products, Column::Name)).ilike(pattern.clone()))
                .add(Expr::col((Products, Column::Description)).ilike(pattern)),
        );
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    condition
}

pub fn apply_sort(finder: Select<Products>, sort: ProductSort) -> Select<Products> {
    let finder = match sort {
        ProductSort::Newest => finder.order_by_desc(Column::CreatedAt),
        ProductSort::Oldest => finder.order_by_asc(Column::CreatedAt),
        ProductSort::PriceLow => finder.order_by_asc(Column::Price),
        ProductSort::PriceHigh => finder.order_by_desc(Column::Price),
    };
    // Stable pages when the sort key ties.
    finder.order_by_asc(Column::Id)
}

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
    scope: Scope,
) -> AppResult<ApiResponse<ProductList>> {
    query.validate_price_range()?;
    let (page, limit, offset) = query.pagination();

    let mut condition = filter_condition(&query);
    let mut finder = Products::find();
    match scope {
        Scope::Public => {
            finder = finder.join(JoinType::InnerJoin, ProductRelation::Suppliers.def());
            condition = condition.add(suppliers::Column::Status.eq(SupplierStatus::Approved));
        }
        Scope::Supplier(supplier_id) => {
            let exists = Suppliers::find_by_id(supplier_id).one(&state.orm).await?;
            if exists.is_none() {
                return Err(AppError::NotFound);
            }
            condition = condition.add(Column::SupplierId.eq(supplier_id));
        }
    }

    let finder = apply_sort(finder.filter(condition), query.sort.unwrap_or_default());

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Product::from);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let supplier = supplier_service::approved_supplier_for(state, user).await?;
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        supplier_id: Set(supplier.id),
        name: Set(payload.name),
        description: Set(payload.description),
        category: Set(payload.category),
        price: Set(payload.price),
        quantity: Set(payload.quantity),
        margin_percentage: Set(payload.margin_percentage),
        image: Set(payload.image),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = %product.id, supplier_id = %supplier.id, "product created");
    audit::record(
        state,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "supplier_id": supplier.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Loads a product and checks it belongs to `supplier`.
async fn owned_product(
    state: &AppState,
    supplier: &suppliers::Model,
    id: Uuid,
) -> AppResult<products::Model> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    if existing.supplier_id != supplier.id {
        return Err(AppError::forbidden("Product belongs to another supplier"));
    }
    Ok(existing)
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let supplier = supplier_service::approved_supplier_for(state, user).await?;
    let existing = owned_product(state, &supplier, id).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(margin_percentage) = payload.margin_percentage {
        active.margin_percentage = Set(margin_percentage);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image));
    }
    active.updated_at = Set(Utc::now().into());

    let product = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let supplier = supplier_service::supplier_for_user(state, user.user_id).await?;
    owned_product(state, &supplier, id).await?;

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = %id, supplier_id = %supplier.id, "product deleted");
    audit::record(
        state,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
