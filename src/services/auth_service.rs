use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use uuid::Uuid;

use crate::{
    audit,
    config::AppConfig,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, ResubmitRequest, UserProfile},
    entity::{
        suppliers::{self, Entity as Suppliers},
        users::{self, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Role, Supplier},
    response::{ApiResponse, Meta},
    services::supplier_service,
    state::AppState,
    workflow::{SupplierAction, SupplierStatus},
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(
    config: &AppConfig,
    user_id: Uuid,
    role: Role,
) -> AppResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(config.jwt_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role,
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((token, expiration))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<UserProfile>> {
    let RegisterRequest {
        fullname,
        email,
        phone,
        password,
        role,
        profile_photo,
        supplier,
    } = payload;
    let email = email.trim().to_lowercase();

    let supplier = match (role, supplier) {
        (Role::Admin, _) => {
            return Err(AppError::forbidden("Admin accounts cannot be self-registered"));
        }
        (Role::Seller, None) => {
            return Err(AppError::BadRequest(
                "Supplier details are required to register as a seller".into(),
            ));
        }
        (Role::Seller, Some(profile)) => Some(profile),
        (Role::Buyer, _) => None,
    };

    let email_taken = Users::find()
        .filter(users::Column::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if email_taken.is_some() {
        return Err(AppError::Conflict("Email is already taken".to_string()));
    }

    let phone_taken = Users::find()
        .filter(users::Column::Phone.eq(phone.as_str()))
        .one(&state.orm)
        .await?;
    if phone_taken.is_some() {
        return Err(AppError::Conflict("Phone number is already taken".to_string()));
    }

    if let Some(profile) = &supplier {
        let pan_taken = Suppliers::find()
            .filter(suppliers::Column::Pan.eq(profile.pan.as_str()))
            .one(&state.orm)
            .await?;
        if pan_taken.is_some() {
            return Err(AppError::Conflict("PAN is already registered".to_string()));
        }
    }

    let password_hash = hash_password(&password)?;
    let now = Utc::now();

    let txn = state.orm.begin().await?;

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        fullname: Set(fullname),
        email: Set(email),
        phone: Set(phone),
        password_hash: Set(password_hash),
        role: Set(role),
        profile_photo: Set(profile_photo),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await
    .map_err(AppError::conflict_on_unique("Email or phone number is already taken"))?;

    let supplier = match supplier {
        Some(profile) => Some(
            suppliers::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.id),
                company_name: Set(profile.company_name),
                pan: Set(profile.pan),
                vat: Set(profile.vat),
                turnover: Set(profile.turnover),
                established: Set(profile.established),
                status: Set(SupplierStatus::Pending),
                rejection_reason: Set(None),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&txn)
            .await
            .map_err(AppError::conflict_on_unique("PAN is already registered"))?,
        ),
        None => None,
    };

    txn.commit().await?;

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");
    audit::record(
        state,
        Some(user.id),
        "user_register",
        "users",
        serde_json::json!({ "user_id": user.id, "role": user.role.as_ref() }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        UserProfile {
            user: user.into(),
            supplier: supplier.map(Supplier::from),
        },
        None,
    ))
}

async fn find_by_credentials(
    state: &AppState,
    email: &str,
    password: &str,
) -> AppResult<users::Model> {
    let email = email.trim().to_lowercase();
    let user = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    if !verify_password(password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    Ok(user)
}

/// Sellers may only log in once their supplier application is approved.
fn ensure_seller_may_login(supplier: Option<&suppliers::Model>) -> AppResult<()> {
    let Some(supplier) = supplier else {
        return Err(AppError::forbidden("Seller account has no supplier profile"));
    };
    match supplier.status {
        SupplierStatus::Approved => Ok(()),
        SupplierStatus::Pending => Err(AppError::forbidden("Seller account is pending approval")),
        SupplierStatus::Rejected => Err(AppError::forbidden(match &supplier.rejection_reason {
            Some(reason) => format!("Seller application was rejected: {reason}"),
            None => "Seller application was rejected".to_string(),
        })),
        SupplierStatus::Blocked => Err(AppError::forbidden("Seller account is blocked")),
    }
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let user = find_by_credentials(state, &email, &password).await?;

    if user.role == Role::Seller {
        let supplier = Suppliers::find()
            .filter(suppliers::Column::UserId.eq(user.id))
            .one(&state.orm)
            .await?;
        if let Err(err) = ensure_seller_may_login(supplier.as_ref()) {
            tracing::info!(user_id = %user.id, "seller login refused");
            return Err(err);
        }
    }

    let (token, expires_at) = issue_token(&state.config, user.id, user.role)?;

    audit::record(
        state,
        Some(user.id),
        "user_login",
        "users",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_at,
            user: user.into(),
        },
        Some(Meta::empty()),
    ))
}

/// Moves a rejected application back to `pending`, optionally with corrected details.
pub async fn resubmit_application(
    state: &AppState,
    payload: ResubmitRequest,
) -> AppResult<ApiResponse<Supplier>> {
    let ResubmitRequest {
        email,
        password,
        supplier: changes,
    } = payload;
    let user = find_by_credentials(state, &email, &password).await?;
    if user.role != Role::Seller {
        return Err(AppError::forbidden("Only sellers can resubmit an application"));
    }

    let supplier = supplier_service::transition(
        state,
        user.id,
        supplier_service::SupplierLookup::Owner(user.id),
        SupplierAction::Resubmit,
        changes,
    )
    .await?;

    Ok(ApiResponse::success(
        "Application resubmitted",
        supplier,
        Some(Meta::empty()),
    ))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    let found = Users::find_by_id(user.user_id)
        .find_also_related(Suppliers)
        .one(&state.orm)
        .await?;
    let (found, supplier) = match found {
        Some(row) => row,
        None => return Err(AppError::NotFound),
    };

    Ok(ApiResponse::success(
        "OK",
        UserProfile {
            user: found.into(),
            supplier: supplier.map(Supplier::from),
        },
        Some(Meta::empty()),
    ))
}
