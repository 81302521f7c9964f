//! Application route configuration.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, boat_owner_routes, boat_routes, geography_routes, password_routes, user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::infra::HealthCheck;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let strict_limit = middleware::from_fn_with_state(state.clone(), rate_limit_auth_middleware);
    let general_limit = middleware::from_fn_with_state(state.clone(), rate_limit_middleware);
    let authenticated = middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Password changes share the auth budget on top of the general one
    let users = user_routes()
        .merge(password_routes().route_layer(strict_limit.clone()))
        .route_layer(authenticated.clone())
        .route_layer(general_limit.clone());

    let boats = boat_routes()
        .merge(
            boat_owner_routes()
                .route_layer(authenticated)
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .route_layer(general_limit.clone());

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public authentication routes (stricter rate limiting)
        .nest("/auth", auth_routes().route_layer(strict_limit))
        .nest("/users", users)
        .nest("/boats", boats)
        .merge(geography_routes().route_layer(general_limit))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to the Boat Rental API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    async fn probe(check: &dyn HealthCheck) -> Self {
        match check.ping().await {
            Ok(()) => Self {
                status: "healthy",
                error: None,
            },
            Err(e) => Self {
                status: "unhealthy",
                error: Some(e.to_string()),
            },
        }
    }

    fn is_healthy(&self) -> bool {
        self.error.is_none()
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, redis) = tokio::join!(
        ServiceStatus::probe(state.database.as_ref()),
        ServiceStatus::probe(state.cache.as_ref()),
    );

    let all_healthy = database.is_healthy() && redis.is_healthy();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth { database, redis },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
