use std::fmt;

use serde::{Deserialize, Serialize};

pub use shared::{ApiError, Coordinate, RouteRequest, RouteResponse, TransportMode};

/// Routing profile understood by the OSRM HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProfile {
    Walking,
    Cycling,
    Driving,
}

impl RoutingProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Cycling => "cycling",
            Self::Driving => "driving",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One road-snapped path returned by a routing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedPath {
    /// Points in (lat, lng) order.
    pub path: Vec<Coordinate>,
    /// Provider-reported length; 0.0 when the provider did not report one.
    pub distance_km: f64,
}

/// Winning outbound leg of a directional search.
#[derive(Debug, Clone, PartialEq)]
pub struct OutRoute {
    pub path: Vec<Coordinate>,
    pub one_way_distance_km: f64,
    pub waypoint: Coordinate,
    pub distance_from_target_km: f64,
    pub bearing_deg: f64,
    pub radius_factor: f64,
    pub queries_issued: usize,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub status: String,
    pub api_service: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub api_service: String,
    pub supported_modes: Vec<TransportMode>,
    pub max_distance_km: u32,
    pub note: String,
}
