//! Tessera API composition root.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod state;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post, put};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tessera_application::{
    AccountService, DirectoryEventSink, DirectoryRepository, PasswordHasher, RoleService,
};
use tessera_core::{AppError, TenantId};
use tessera_domain::PasswordPolicy;
use tessera_infrastructure::{
    Argon2PasswordHasher, InMemoryDirectoryRepository, PostgresDirectoryRepository,
    TracingEventSink,
};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
    let api_port = env::var("API_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3001);
    let frontend_url =
        env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
    let storage_provider = env::var("STORAGE_PROVIDER").unwrap_or_else(|_| "memory".to_owned());

    let policy = password_policy_from_env()?;

    let seed_tenant_id = env::var("DEV_DEFAULT_TENANT_ID")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            uuid::Uuid::parse_str(value.as_str())
                .map(TenantId::from_uuid)
                .map_err(|error| {
                    AppError::Validation(format!("invalid DEV_DEFAULT_TENANT_ID: {error}"))
                })
        })
        .transpose()?;

    let repository: Arc<dyn DirectoryRepository> = match storage_provider.as_str() {
        "memory" => Arc::new(InMemoryDirectoryRepository::new()),
        "postgres" => {
            let database_url = required_env("DATABASE_URL")?;

            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to connect to database: {error}"))
                })?;

            sqlx::migrate!("../../crates/infrastructure/migrations")
                .run(&pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to run migrations: {error}"))
                })?;

            Arc::new(PostgresDirectoryRepository::new(pool))
        }
        other => {
            return Err(AppError::Validation(format!(
                "unsupported STORAGE_PROVIDER '{other}' (expected 'memory' or 'postgres')"
            )));
        }
    };

    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let events: Arc<dyn DirectoryEventSink> = Arc::new(TracingEventSink::new());

    let account_service = AccountService::new(
        repository.clone(),
        password_hasher,
        events.clone(),
        policy,
    );
    let role_service = RoleService::new(repository, events);

    if let Some(tenant_id) = seed_tenant_id {
        role_service.seed_system_roles(tenant_id).await?;
        info!(tenant_id = %tenant_id.as_uuid(), "seeded system roles for development tenant");
    }

    let app_state = AppState {
        account_service,
        role_service,
    };

    let cors_origin = HeaderValue::from_str(&frontend_url).map_err(|error| {
        AppError::Validation(format!("invalid FRONTEND_URL '{frontend_url}': {error}"))
    })?;
    let cors_layer = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route(
            "/api/tenants/{tenant_id}/accounts",
            get(handlers::list_accounts_handler).post(handlers::invite_account_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/accounts/stats",
            get(handlers::directory_stats_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/accounts/expiring",
            get(handlers::expiring_accounts_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/accounts/{account_id}",
            put(handlers::update_account_handler).delete(handlers::delete_account_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/accounts/{account_id}/status",
            post(handlers::toggle_status_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/accounts/{account_id}/two-factor",
            post(handlers::toggle_two_factor_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/accounts/{account_id}/password",
            post(handlers::reset_password_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/roles",
            get(handlers::list_roles_handler).post(handlers::create_role_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/roles/{role_id}",
            put(handlers::update_role_handler).delete(handlers::delete_role_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state);

    let host = IpAddr::from_str(&api_host)
        .map_err(|error| AppError::Internal(format!("invalid API_HOST '{api_host}': {error}")))?;
    let address = SocketAddr::from((host, api_port));

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, provider = %storage_provider, "tessera-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn password_policy_from_env() -> Result<PasswordPolicy, AppError> {
    let mut policy = PasswordPolicy::default();

    if let Ok(value) = env::var("PASSWORD_MIN_LENGTH") {
        policy.min_length = value.parse().map_err(|error| {
            AppError::Validation(format!("invalid PASSWORD_MIN_LENGTH '{value}': {error}"))
        })?;
    }

    if let Ok(value) = env::var("PASSWORD_EXPIRY_DAYS") {
        policy.expiry_days = value.parse().map_err(|error| {
            AppError::Validation(format!("invalid PASSWORD_EXPIRY_DAYS '{value}': {error}"))
        })?;
    }

    Ok(policy)
}
