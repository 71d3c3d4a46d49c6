use sea_orm::DatabaseConnection;
use wholesale_marketplace_api::{
    audit::{log_audit, record},
    config::AppConfig,
    state::AppState,
};

fn disconnected_state() -> AppState {
    let config = AppConfig {
        database_url: String::new(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "secret".into(),
        jwt_ttl_hours: 1,
        cors_origins: Vec::new(),
        max_body_bytes: 1024,
        concurrency_limit: 1,
        db_max_connections: 1,
        run_migrations: false,
    };
    AppState::new(DatabaseConnection::Disconnected, config)
}

#[tokio::test]
async fn audit_write_without_database_is_an_error() {
    let state = disconnected_state();
    let result = log_audit(&state, None, "user_login", Some("users"), None).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn best_effort_audit_swallows_failures() {
    let state = disconnected_state();
    record(&state, None, "user_login", "users", serde_json::json!({})).await;
}
