use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;
use wholesale_marketplace_api::{
    config::AppConfig,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{products, suppliers, users},
    models::Role,
    services::auth_service::hash_password,
    workflow::SupplierStatus,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url, config.db_max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Admin", "admin@example.com", "9800000001", "admin123", Role::Admin).await?;
    let buyer_id = ensure_user(&orm, "Demo Buyer", "buyer@example.com", "9800000002", "buyer123", Role::Buyer).await?;
    let seller_id = ensure_user(&orm, "Demo Seller", "seller@example.com", "9800000003", "seller123", Role::Seller).await?;
    let supplier_id = ensure_supplier(&orm, seller_id).await?;
    seed_products(&orm, supplier_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, Buyer ID: {buyer_id}, Supplier ID: {supplier_id}");
    Ok(())
}

async fn ensure_user(
    orm: &OrmConn,
    fullname: &str,
    email: &str,
    phone: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let existing = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(orm)
        .await?;
    if let Some(user) = existing {
        println!("User {email} already exists");
        return Ok(user.id);
    }

    let password_hash = hash_password(password)?;
    let now = Utc::now();
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        fullname: Set(fullname.to_string()),
        email: Set(email.to_string()),
        phone: Set(phone.to_string()),
        password_hash: Set(password_hash),
        role: Set(role),
        profile_photo: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user.id)
}

async fn ensure_supplier(orm: &OrmConn, user_id: Uuid) -> anyhow::Result<Uuid> {
    let existing = suppliers::Entity::find()
        .filter(suppliers::Column::UserId.eq(user_id))
        .one(orm)
        .await?;
    if let Some(supplier) = existing {
        return Ok(supplier.id);
    }

    let now = Utc::now();
    let supplier = suppliers::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        company_name: Set("Himalayan Traders".to_string()),
        pan: Set("600000001".to_string()),
        vat: Set(Some("VAT-0001".to_string())),
        turnover: Set(Some("10M-50M".to_string())),
        established: Set(Some(2012)),
        status: Set(SupplierStatus::Approved),
        rejection_reason: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured approved supplier {}", supplier.company_name);
    Ok(supplier.id)
}

async fn seed_products(orm: &OrmConn, supplier_id: Uuid) -> anyhow::Result<()> {
    let existing = products::Entity::find()
        .filter(products::Column::SupplierId.eq(supplier_id))
        .one(orm)
        .await?;
    if existing.is_some() {
        println!("Products already seeded");
        return Ok(());
    }

    let catalog = vec![
        ("Basmati Rice 25kg", "Long grain aged rice", "grocery", 3200, 400),
        ("Cotton T-Shirt Bundle", "Pack of 50 plain tees", "apparel", 9500, 120),
        ("Steel Water Bottle", "1L insulated, carton of 24", "household", 14400, 80),
        ("LED Bulb 9W", "Box of 100", "electronics", 18000, 60),
    ];

    let now = Utc::now();
    for (name, desc, category, price, quantity) in catalog {
        products::ActiveModel {
            id: Set(Uuid::new_v4()),
            supplier_id: Set(supplier_id),
            name: Set(name.to_string()),
            description: Set(Some(desc.to_string())),
            category: Set(category.to_string()),
            price: Set(price),
            quantity: Set(quantity),
            margin_percentage: Set(20.0),
            image: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
