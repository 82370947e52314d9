use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Walking,
    Jogging,
    Cycling,
}

impl TransportMode {
    pub const ALL: [TransportMode; 3] = [Self::Walking, Self::Jogging, Self::Cycling];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Jogging => "jogging",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown transport mode '{}'", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for TransportMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Body of `POST /generate-route`.
///
/// `mode` stays a plain string so that unsupported values reach validation
/// and get a readable message instead of a deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "distance")]
    pub distance_km: f64,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    pub path: Vec<Coordinate>,
    pub one_way_distance_km: f64,
    pub estimated_duration_minutes: u32,
    pub mode: String,
    pub waypoint: Vec<Coordinate>,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_modes() {
        assert_eq!("walking".parse(), Ok(TransportMode::Walking));
        assert_eq!("jogging".parse(), Ok(TransportMode::Jogging));
        assert_eq!("cycling".parse(), Ok(TransportMode::Cycling));
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "driving".parse::<TransportMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown transport mode 'driving'");
        assert!("Walking".parse::<TransportMode>().is_err());
    }

    #[test]
    fn coordinate_bounds() {
        assert!(Coordinate::new(90.0, -180.0).is_valid());
        assert!(!Coordinate::new(95.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, 180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn request_accepts_distance_alias() {
        let req: RouteRequest = serde_json::from_str(
            r#"{"latitude": 1.0, "longitude": 2.0, "distance": 5.0, "mode": "walking"}"#,
        )
        .unwrap();
        assert_eq!(req.distance_km, 5.0);
    }
}
