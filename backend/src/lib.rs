pub mod assembly;
pub mod config;
pub mod error;
pub mod loops;
pub mod models;
pub mod osrm;
pub mod routing;
pub mod validation;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use crate::assembly::build_route_response;
use crate::error::RouteError;
use crate::loops::RouteGenerator;
use crate::models::{HealthReport, RouteRequest, RouteResponse, ServiceInfo, TransportMode};
use crate::osrm::RouteProvider;
use crate::validation::{MAX_DISTANCE_KM, validate_request};

const API_SERVICE: &str = "OSRM";

pub struct AppState<P> {
    pub generator: Arc<RouteGenerator<P>>,
}

impl<P> AppState<P> {
    pub fn new(generator: RouteGenerator<P>) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
        }
    }
}

pub fn create_router<P: RouteProvider + 'static>(state: AppState<P>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/generate-route", post(generate_route_handler::<P>))
        .with_state(state)
}

async fn generate_route_handler<P: RouteProvider + 'static>(
    State(state): State<AppState<P>>,
    Json(req): Json<RouteRequest>,
) -> Result<Json<RouteResponse>, RouteError> {
    let validated = validate_request(&req)?;
    let route = state
        .generator
        .generate_loop_route(validated.start, validated.distance_km, validated.mode)
        .await?;

    Ok(Json(build_route_response(
        route,
        validated.mode,
        state.generator.transport(),
    )))
}

async fn root_handler() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Free Route Generator API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "active".to_string(),
        api_service: API_SERVICE.to_string(),
    })
}

async fn health_handler() -> Json<HealthReport> {
    Json(HealthReport {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
        api_service: API_SERVICE.to_string(),
        supported_modes: TransportMode::ALL.to_vec(),
        max_distance_km: MAX_DISTANCE_KM as u32,
        note: "No API key required.".to_string(),
    })
}
