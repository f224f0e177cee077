pub mod health_routes;
pub mod task_routes;

use std::{sync::Arc, time::Duration};
use axum::{Router, http::{HeaderName, HeaderValue}};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use crate::{app_state::AppState, settings::Settings};

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

pub fn map_routes(app_state: Arc<AppState>) -> Router {
    let router = Router::new()
        .merge(health_routes::get_router())
        .merge(task_routes::get_router(app_state.clone()));
    apply_layers(router, &app_state.settings)
}

/// Deadline (408), request id, tracing and CORS, outermost last.
pub fn apply_layers(router: Router, settings: &Settings) -> Router {
    let timeout = Duration::from_secs(settings.request_timeout_in_seconds);
    let cors = cors_layer(&settings.cors_allowed_origins);

    router
        .layer(TimeoutLayer::new(timeout))
        .layer(PropagateRequestIdLayer::new(REQUEST_ID_HEADER))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(REQUEST_ID_HEADER, MakeRequestUuid))
        .layer(cors)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    let allow_origin = if origins.is_empty() { AllowOrigin::from(Any) } else { AllowOrigin::list(origins) };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
