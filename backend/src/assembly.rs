use crate::{
    config::TransportTable,
    models::{OutRoute, RouteResponse, TransportMode},
};

pub fn build_route_response(
    route: OutRoute,
    mode: TransportMode,
    transport: &TransportTable,
) -> RouteResponse {
    let estimated_duration_minutes =
        estimated_duration_minutes(route.one_way_distance_km, transport.speed_kmh(mode));
    let message = format!(
        "Generated {:.2}km out route. Returning via the same route will complete the total distance.",
        route.one_way_distance_km
    );

    RouteResponse {
        path: route.path,
        one_way_distance_km: round_to_hundredths(route.one_way_distance_km),
        estimated_duration_minutes,
        mode: mode.to_string(),
        waypoint: vec![route.waypoint],
        success: true,
        message,
    }
}

/// Travel time at `speed_kmh`, rounded to whole minutes.
pub fn estimated_duration_minutes(distance_km: f64, speed_kmh: f64) -> u32 {
    if speed_kmh <= 0.0 || !distance_km.is_finite() {
        return 0;
    }
    ((distance_km / speed_kmh) * 60.0).round().max(0.0) as u32
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
