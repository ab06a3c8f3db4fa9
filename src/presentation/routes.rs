//! Route definitions and server setup

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::presentation::{
    controllers::{AppState, health_check, scan_image},
    middleware::api_key_middleware,
    models::{
        ErrorBody, ErrorResponse, HealthResponse, ScanRequestDto, ScanResponse, SummaryDto,
        VulnerabilityDto,
    },
};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::controllers::scan_image,
        crate::presentation::controllers::health_check
    ),
    components(
        schemas(
            ScanRequestDto,
            ScanResponse,
            VulnerabilityDto,
            SummaryDto,
            ErrorResponse,
            ErrorBody,
            HealthResponse,
            crate::domain::value_objects::Severity
        )
    ),
    tags(
        (name = "scan", description = "Synchronous container image scanning"),
        (name = "health", description = "System health monitoring")
    ),
    info(
        title = "Trivy Gateway API",
        version = "0.1.0",
        description = "Synchronous container-image vulnerability scanning over the Trivy scanner. Accepts an image reference, runs a bounded scan, and returns normalized findings with a severity summary."
    )
)]
pub struct ApiDoc;

/// Build the CORS layer from configuration.
fn cors_layer(config: &Config) -> CorsLayer {
    let allowed = &config.server.allowed_origins;
    let base = CorsLayer::new()
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(3600));

    if allowed.len() == 1 && allowed[0] == "*" {
        base.allow_origin(tower_http::cors::AllowOrigin::mirror_request())
    } else {
        let mut layer = base;
        for origin in allowed {
            match axum::http::HeaderValue::from_str(origin) {
                Ok(origin_header) => {
                    layer = layer.allow_origin(origin_header);
                }
                Err(_) => {
                    tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                }
            }
        }
        layer
    }
}

/// Create the application router
pub fn create_router(state: AppState, config: &Config) -> Router {
    let mut scan_routes = Router::new().route("/scan", post(scan_image));

    // Credential checks normally live at the gateway in front of this
    // service; the middleware only exists for gateway-less deployments.
    if config.auth.require_api_key {
        scan_routes = scan_routes.route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));
    }

    let mut router = Router::new()
        .merge(scan_routes)
        .route("/health", get(health_check));

    // Avoid leaking interactive docs in hardened deployments.
    if config.server.enable_docs {
        router =
            router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_seconds,
        )));

    router.layer(service_builder).with_state(state)
}
