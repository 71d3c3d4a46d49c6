//! Declarative route authorization.
//!
//! Routes state the [`Capability`] they need and [`require_capability`] decides it from the
//! caller's role before the handler runs. Ownership rules that need the database stay in the
//! services.

use axum::{
    extract::{Request, State},
    middleware::{Next, from_fn_with_state},
    response::Response,
    routing::MethodRouter,
};

use crate::{error::AppError, middleware::auth::AuthUser, models::Role, state::AppState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Capability {
    /// Any logged-in user.
    Authenticated,
    ManageListings,
    ManageSupplierProfile,
    RespondToQuotes,
    ReviewSuppliers,
}

impl Capability {
    pub fn granted_to(self, role: Role) -> bool {
        match self {
            Capability::Authenticated => true,
            Capability::ManageListings
            | Capability::ManageSupplierProfile
            | Capability::RespondToQuotes => role == Role::Seller,
            Capability::ReviewSuppliers => role == Role::Admin,
        }
    }

    pub fn check(self, user: Option<&AuthUser>) -> Result<(), AppError> {
        let user = user.ok_or_else(|| AppError::Unauthorized("Authentication required".into()))?;
        if self.granted_to(user.role) {
            Ok(())
        } else {
            tracing::debug!(user_id = %user.user_id, role = %user.role, capability = %self, "capability denied");
            Err(AppError::forbidden(format!("{} role cannot {self}", user.role)))
        }
    }
}

pub async fn require_capability(
    State(capability): State<Capability>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    capability.check(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}

/// Wraps a method router so every method on it requires `capability`.
pub fn guarded(capability: Capability, route: MethodRouter<AppState>) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(capability, require_capability))
}
