use crate::{
    error::RouteError,
    models::{Coordinate, RouteRequest, TransportMode},
};

pub const MAX_DISTANCE_KM: f64 = 50.0;

/// A request that passed boundary validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedRequest {
    pub start: Coordinate,
    pub distance_km: f64,
    pub mode: TransportMode,
}

pub fn validate_request(req: &RouteRequest) -> Result<ValidatedRequest, RouteError> {
    if !(req.distance_km > 0.0 && req.distance_km <= MAX_DISTANCE_KM) {
        return Err(RouteError::InvalidInput(format!(
            "Distance must be between 0 and {MAX_DISTANCE_KM} km"
        )));
    }

    let mode: TransportMode = req.mode.parse().map_err(|_| {
        RouteError::InvalidInput("Mode must be 'walking', 'jogging', or 'cycling'".to_string())
    })?;

    let start = Coordinate::new(req.latitude, req.longitude);
    if !start.is_valid() {
        return Err(RouteError::InvalidInput("Invalid coordinates".to_string()));
    }

    Ok(ValidatedRequest {
        start,
        distance_km: req.distance_km,
        mode,
    })
}
