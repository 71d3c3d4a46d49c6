use sea_orm::{ConnectionTrait, DbBackend, Statement};
use serde_json::Value;
use uuid::Uuid;

use crate::{error::AppResult, state::AppState};

pub async fn log_audit(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let values: [sea_orm::Value; 5] = [
        Uuid::new_v4().into(),
        user_id.into(),
        action.into(),
        resource.map(str::to_string).into(),
        metadata.into(),
    ];
    let statement = Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
        values,
    );
    state.orm.execute(statement).await?;

    Ok(())
}

/// Best-effort [`log_audit`]: a failed audit write is logged and never fails the request.
pub async fn record(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(state, user_id, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
