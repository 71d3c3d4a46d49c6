use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement,
};
use uuid::Uuid;
use wholesale_marketplace_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest, ResubmitRequest, SupplierProfileRequest},
        favorites::AddFavoriteRequest,
        products::CreateProductRequest,
        quotes::{CreateQuoteRequest, UpdateQuoteStatusRequest},
    },
    entity::{AuditLogs, audit_logs, users::ActiveModel as UserActive},
    error::AppError,
    middleware::auth::AuthUser,
    models::Role,
    routes::params::{Pagination, ProductQuery, QuoteListQuery},
    services::{
        auth_service, favorite_service, product_service::{self, Scope}, quote_service,
        supplier_service,
    },
    state::AppState,
    workflow::{QuoteStatus, SupplierAction, SupplierStatus},
};

// Integration flow: seller registers -> admin approves -> seller lists -> buyer favourites and requests a quote.
#[tokio::test]
async fn supplier_approval_catalog_and_quote_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin = AuthUser {
        user_id: create_admin(&state).await?,
        role: Role::Admin,
    };

    // Seller registers and starts pending
    let seller_profile = auth_service::register_user(
        &state,
        seller_registration("seller@example.com", "9800000001", "123456789"),
    )
    .await?
    .data
    .unwrap();
    let supplier = seller_profile.supplier.expect("supplier profile");
    assert_eq!(supplier.status, SupplierStatus::Pending);

    let refused = auth_service::login_user(&state, login("seller@example.com")).await;
    assert!(matches!(refused, Err(AppError::Forbidden(_))));

    // Duplicate PAN is a conflict
    let duplicate = auth_service::register_user(
        &state,
        seller_registration("other@example.com", "9800000002", "123456789"),
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // Reject without reason is refused, with reason it sticks, resubmit returns to pending
    let no_reason = supplier_service::review_supplier(
        &state,
        &admin,
        supplier.id,
        SupplierAction::Reject {
            reason: String::new(),
        },
    )
    .await;
    assert!(matches!(no_reason, Err(AppError::BadRequest(_))));

    let rejected = supplier_service::review_supplier(
        &state,
        &admin,
        supplier.id,
        SupplierAction::Reject {
            reason: "PAN document unreadable".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(rejected.status, SupplierStatus::Rejected);

    let resubmitted = auth_service::resubmit_application(
        &state,
        ResubmitRequest {
            email: "seller@example.com".into(),
            password: "secret123".into(),
            supplier: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(resubmitted.status, SupplierStatus::Pending);
    assert_eq!(resubmitted.rejection_reason, None);

    // Admin approves, seller can now log in
    let approved =
        supplier_service::review_supplier(&state, &admin, supplier.id, SupplierAction::Approve)
            .await?
            .data
            .unwrap();
    assert_eq!(approved.status, SupplierStatus::Approved);

    let logged_in = auth_service::login_user(&state, login("seller@example.com"))
        .await?
        .data
        .unwrap();
    assert_eq!(logged_in.user.role, Role::Seller);
    let seller = AuthUser {
        user_id: logged_in.user.id,
        role: Role::Seller,
    };

    // Seller lists a product
    let product = product_service::create_product(
        &state,
        &seller,
        CreateProductRequest {
            name: "Basmati Rice 25kg".into(),
            description: Some("Long grain".into()),
            category: "grocery".into(),
            price: 500,
            quantity: 10,
            margin_percentage: 20.0,
            image: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(product.supplier_id, supplier.id);
    assert_eq!(product.retail_price, 600.0);

    let by_category = product_service::list_products(
        &state,
        ProductQuery {
            category: Some("grocery".into()),
            ..Default::default()
        },
        Scope::Public,
    )
    .await?;
    assert!(by_category.data.unwrap().items.iter().any(|p| p.id == product.id));
    assert_eq!(by_category.meta.unwrap().total, Some(1));

    let outside_range = product_service::list_products(
        &state,
        ProductQuery {
            min_price: Some(100),
            max_price: Some(200),
            ..Default::default()
        },
        Scope::Public,
    )
    .await?;
    assert!(outside_range.data.unwrap().items.is_empty());

    let inside_range = product_service::list_products(
        &state,
        ProductQuery {
            min_price: Some(500),
            max_price: Some(500),
            ..Default::default()
        },
        Scope::Public,
    )
    .await?;
    assert_eq!(inside_range.data.unwrap().items.len(), 1);

    // Blocked supplier's listings drop out of the public catalog
    supplier_service::review_supplier(&state, &admin, supplier.id, SupplierAction::Block).await?;
    let hidden = product_service::list_products(&state, ProductQuery::default(), Scope::Public).await?;
    assert!(hidden.data.unwrap().items.is_empty());
    let blocked_create = product_service::create_product(
        &state,
        &seller,
        CreateProductRequest {
            name: "Ghee 1L".into(),
            description: None,
            category: "grocery".into(),
            price: 900,
            quantity: 5,
            margin_percentage: 20.0,
            image: None,
        },
    )
    .await;
    assert!(matches!(blocked_create, Err(AppError::Forbidden(_))));
    supplier_service::review_supplier(&state, &admin, supplier.id, SupplierAction::Unblock).await?;

    // A second approved seller cannot delete someone else's product
    let rival_profile = auth_service::register_user(
        &state,
        seller_registration("rival@example.com", "9800000003", "987654321"),
    )
    .await?
    .data
    .unwrap();
    let rival_supplier = rival_profile.supplier.expect("rival supplier");
    supplier_service::review_supplier(&state, &admin, rival_supplier.id, SupplierAction::Approve)
        .await?;
    let rival = AuthUser {
        user_id: rival_profile.user.id,
        role: Role::Seller,
    };
    let foreign_delete = product_service::delete_product(&state, &rival, product.id).await;
    assert!(matches!(foreign_delete, Err(AppError::Forbidden(_))));

    // Buyer favourites the product; the second add conflicts
    let buyer_profile = auth_service::register_user(
        &state,
        RegisterRequest {
            fullname: "Bina Buyer".into(),
            email: "Buyer@Example.com".into(),
            phone: "9800000004".into(),
            password: "secret123".into(),
            role: Role::Buyer,
            profile_photo: None,
            supplier: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(buyer_profile.user.email, "buyer@example.com");
    let buyer = AuthUser {
        user_id: buyer_profile.user.id,
        role: Role::Buyer,
    };

    favorite_service::add_favorite(
        &state,
        &buyer,
        AddFavoriteRequest {
            product_id: product.id,
        },
    )
    .await?;
    let again = favorite_service::add_favorite(
        &state,
        &buyer,
        AddFavoriteRequest {
            product_id: product.id,
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let favourites =
        favorite_service::list_favorites(&state, &buyer, Pagination::default()).await?;
    assert_eq!(favourites.data.unwrap().items.len(), 1);

    favorite_service::remove_favorite(&state, &buyer, product.id).await?;
    let missing = favorite_service::remove_favorite(&state, &buyer, product.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    let status = favorite_service::favorite_status(&state, &buyer, product.id)
        .await?
        .data
        .unwrap();
    assert!(!status.is_favourite);

    // Quote lifecycle
    let quote = quote_service::create_quote_request(
        &state,
        &buyer,
        CreateQuoteRequest {
            product_id: product.id,
            name: "Bina Buyer".into(),
            email: "buyer@example.com".into(),
            phone: "9800000004".into(),
            company: Some("Bina Stores".into()),
            quantity: 40,
            message: Some("Need delivery in Pokhara".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(quote.status, QuoteStatus::Pending);

    let received =
        quote_service::list_received_quote_requests(&state, &seller, QuoteListQuery::default())
            .await?;
    assert!(received.data.unwrap().items.iter().any(|q| q.id == quote.id));

    let rival_view = quote_service::get_quote_request(&state, &rival, quote.id).await;
    assert!(matches!(rival_view, Err(AppError::Forbidden(_))));

    let responded = quote_service::update_quote_status(
        &state,
        &seller,
        quote.id,
        UpdateQuoteStatusRequest {
            status: QuoteStatus::Responded,
            response_message: Some("Rs 480 per bag for 40 bags".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(responded.status, QuoteStatus::Responded);

    let backward = quote_service::update_quote_status(
        &state,
        &seller,
        quote.id,
        UpdateQuoteStatusRequest {
            status: QuoteStatus::Pending,
            response_message: None,
        },
    )
    .await;
    assert!(matches!(backward, Err(AppError::BadRequest(_))));

    let late_delete = quote_service::delete_quote_request(&state, &buyer, quote.id).await;
    assert!(matches!(late_delete, Err(AppError::BadRequest(_))));
    let foreign_quote_delete = quote_service::delete_quote_request(&state, &rival, quote.id).await;
    assert!(matches!(foreign_quote_delete, Err(AppError::Forbidden(_))));

    // Owner can delete their own product
    product_service::delete_product(&state, &seller, product.id).await?;
    let gone = product_service::get_product(&state, product.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    // Approvals are audited
    let transitions = AuditLogs::find()
        .filter(audit_logs::Column::Action.eq("supplier_approve"))
        .count(&state.orm)
        .await?;
    assert_eq!(transitions, 2);

    Ok(())
}

fn seller_registration(email: &str, phone: &str, pan: &str) -> RegisterRequest {
    RegisterRequest {
        fullname: "Sita Seller".into(),
        email: email.into(),
        phone: phone.into(),
        password: "secret123".into(),
        role: Role::Seller,
        profile_photo: None,
        supplier: Some(SupplierProfileRequest {
            company_name: format!("Traders {pan}"),
            pan: pan.into(),
            vat: None,
            turnover: None,
            established: Some(2015),
        }),
    }
}

fn login(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.into(),
        password: "secret123".into(),
    }
}

fn test_config(database_url: &str) -> AppConfig {
    AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "flow-test-secret".into(),
        jwt_ttl_hours: 1,
        cors_origins: Vec::new(),
        max_body_bytes: 1024 * 1024,
        concurrency_limit: 16,
        db_max_connections: 5,
        run_migrations: true,
    }
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url, 5).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE quote_requests, favorites, audit_logs, products, suppliers, users CASCADE",
    ))
    .await?;

    Ok(AppState::new(orm, test_config(database_url)))
}

async fn create_admin(state: &AppState) -> anyhow::Result<Uuid> {
    let now = Utc::now();
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        fullname: Set("Admin".into()),
        email: Set("admin@example.com".into()),
        phone: Set("9800000000".into()),
        password_hash: Set(auth_service::hash_password("admin123")?),
        role: Set(Role::Admin),
        profile_photo: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}
