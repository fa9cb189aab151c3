//! Tally Web Server
//!
//! Axum-based REST API for the Tally expense tracker.
//!
//! Security features:
//! - Bearer-token sessions (only a digest of each token is stored)
//! - Restrictive CORS policy
//! - Security headers on every response
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use tally_core::ai::AIBackend;
use tally_core::db::Database;
use tally_core::models::User;
use tally_core::ExpenseAnalyst;

mod handlers;

/// Maximum accepted JSON body size (64 KB)
pub const MAX_BODY_SIZE: usize = 64 * 1024;

/// Environment variable listing allowed CORS origins (comma-separated)
pub const ALLOWED_ORIGINS_ENV: &str = "TALLY_ALLOWED_ORIGINS";

/// Environment variable enabling the `debug` field on analysis replies
pub const EXPOSE_DEBUG_ENV: &str = "TALLY_EXPOSE_DEBUG";

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Include the provider failure reason in analysis replies
    pub expose_debug: bool,
}

impl ServerConfig {
    /// Read `TALLY_ALLOWED_ORIGINS` and `TALLY_EXPOSE_DEBUG`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var(ALLOWED_ORIGINS_ENV)
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        let expose_debug = std::env::var(EXPOSE_DEBUG_ENV)
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            allowed_origins,
            expose_debug,
        }
    }
}

/// Parse a comma-separated origin list
pub fn parse_origins(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub analyst: ExpenseAnalyst,
}

/// The user behind the bearer token of the current request
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Pull the token out of `Authorization: Bearer <token>`
fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Authentication middleware for the protected routes
///
/// Resolves the bearer token to a user and stores it as a [`CurrentUser`]
/// request extension. Anything else is answered with 401.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(&request) else {
        debug!(path = %path, "Missing bearer token");
        return AppError::unauthorized().into_response();
    };

    match state.db.user_for_token(&token) {
        Ok(Some(user)) => {
            debug!(user_id = user.id, path = %path, "Authenticated via session token");
            request.extensions_mut().insert(CurrentUser { user, token });
            next.run(request).await
        }
        Ok(None) => {
            warn!(path = %path, "Rejected unknown or expired session token");
            AppError::unauthorized().into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router, configuring the analyst from the environment
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    let analyst = ExpenseAnalyst::from_env();
    log_ai_backend(&analyst);
    create_router_with_analyst(db, static_dir, config, analyst)
}

/// Create the application router with an explicit analyst (for testing)
pub fn create_router_with_analyst(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    analyst: ExpenseAnalyst,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        analyst,
    });

    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login));

    let protected_routes = Router::new()
        // Session
        .route("/logout", post(handlers::logout))
        .route("/me", get(handlers::get_me))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route("/expenses/:id", delete(handlers::delete_expense))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Analysis
        .route("/analysis", get(handlers::get_analysis))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = public_routes.merge(protected_routes);

    // Build CORS layer
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; connect-src 'self'; frame-ancestors 'none'",
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if config.expose_debug {
        warn!("⚠️  Analysis replies include provider failure details - do not expose to users!");
    }

    match db.purge_expired_sessions() {
        Ok(count) if count > 0 => info!("Purged {} expired session(s)", count),
        Ok(_) => {}
        Err(e) => warn!("Failed to purge expired sessions: {}", e),
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log which analysis backend is active
fn log_ai_backend(analyst: &ExpenseAnalyst) {
    match analyst.ai() {
        Some(client) => info!(
            "✅ External model configured: {} at {} (timeout {}s)",
            client.model(),
            client.host(),
            analyst.timeout().as_secs()
        ),
        None => info!(
            "ℹ️  External model not configured (set GEMINI_API_KEY to enable); using rule-based analysis"
        ),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    fn with_status(status: StatusCode, msg: &str) -> Self {
        Self {
            status,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn bad_request(msg: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, msg)
    }

    pub fn unauthorized() -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn not_found(msg: &str) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, msg)
    }

    pub fn internal(msg: &str) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    /// Map a core error, surfacing validation failures as 400
    pub fn from_core(err: tally_core::Error) -> Self {
        match err {
            tally_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            tally_core::Error::NotFound(msg) => Self::not_found(&msg),
            other => other.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "success": false,
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            internal: Some(err.into()),
        }
    }
}
