use crate::{
    config::{SearchConfig, TransportTable},
    models::{Coordinate, OutRoute, TransportMode},
    osrm::RouteProvider,
    routing::total_distance_km,
};

/// Approximate length of one degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;
/// Longitude offsets are computed as if the start were no closer to a pole
/// than this, so the projection stays finite at ±90°.
const MAX_PROJECTION_LATITUDE_DEG: f64 = 89.0;
/// Relative gap between provider and locally summed distance worth a debug line.
const DISTANCE_MISMATCH_RATIO: f64 = 0.1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoopGenerationError {
    #[error("unable to find a suitable out route after {queries_issued} routing queries; try a different location or distance")]
    NoRouteFound { queries_issued: usize },
}

#[derive(Debug)]
struct RouteCandidate {
    bearing_deg: f64,
    radius_factor: f64,
    destination: Coordinate,
    path: Vec<Coordinate>,
    distance_km: f64,
    distance_from_target_km: f64,
}

/// Out-and-back route generation over a road routing provider.
pub struct RouteGenerator<P> {
    provider: P,
    transport: TransportTable,
    search: SearchConfig,
}

impl<P: RouteProvider> RouteGenerator<P> {
    pub fn new(provider: P, transport: TransportTable, search: SearchConfig) -> Self {
        Self {
            provider,
            transport,
            search,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn transport(&self) -> &TransportTable {
        &self.transport
    }

    /// Outbound leg for a round trip of `target_distance_km`.
    ///
    /// The caller is expected to retrace the returned path to get back to
    /// `start`; no inbound path is computed.
    pub async fn generate_loop_route(
        &self,
        start: Coordinate,
        target_distance_km: f64,
        mode: TransportMode,
    ) -> Result<OutRoute, LoopGenerationError> {
        tracing::info!(
            "Generating {:.2}km {} out route from ({:.5}, {:.5})",
            target_distance_km,
            mode,
            start.lat,
            start.lng
        );

        self.find_best_out_route(start, target_distance_km, mode)
            .await
            .inspect_err(|err| tracing::error!("Route generation failed: {err}"))
    }

    /// Directional sampling search for the outbound leg.
    ///
    /// # Algorithm
    ///
    /// For each bearing (outer loop) and radius factor (inner loop) of the
    /// [`SearchConfig`], a destination is projected at
    /// `half_distance * factor` km from `start` and routed by the provider.
    /// Every candidate whose road path has at least two points is scored by
    /// `|road_distance - half_distance|`, where `road_distance` is the provider
    /// distance when positive and the summed path length otherwise. The lowest
    /// score wins; on ties the earlier candidate is kept.
    ///
    /// Queries run one after another and stop at `max_queries`. A failed query
    /// still counts and is never retried.
    ///
    /// # Returns
    /// - `Ok(OutRoute)`: best candidate
    /// - `Err(NoRouteFound)`: no query produced a usable path
    pub async fn find_best_out_route(
        &self,
        start: Coordinate,
        target_distance_km: f64,
        mode: TransportMode,
    ) -> Result<OutRoute, LoopGenerationError> {
        let half_distance = target_distance_km / 2.0;
        let profile = self.transport.profile(mode);

        tracing::info!(
            "Finding best out route for {:.2}km total (half: {:.2}km), profile {}",
            target_distance_km,
            half_distance,
            profile
        );

        let mut best: Option<RouteCandidate> = None;
        let mut queries_issued = 0;

        'bearings: for &bearing_deg in &self.search.bearings_deg {
            for &radius_factor in &self.search.radius_factors {
                if queries_issued >= self.search.max_queries {
                    tracing::info!(
                        "Routing query limit of {} reached for this request",
                        self.search.max_queries
                    );
                    break 'bearings;
                }

                let destination =
                    project_destination(start, half_distance * radius_factor, bearing_deg);
                let routed = self.provider.route(start, destination, profile).await;
                queries_issued += 1;

                let Some(routed) = routed else {
                    tracing::debug!(
                        "Direction {bearing_deg:.0}°, factor {radius_factor:.2}: no route"
                    );
                    continue;
                };
                if routed.path.len() < 2 {
                    tracing::debug!(
                        "Direction {bearing_deg:.0}°, factor {radius_factor:.2}: degenerate path ({} points)",
                        routed.path.len()
                    );
                    continue;
                }

                let summed_km = total_distance_km(&routed.path);
                let distance_km = if routed.distance_km > 0.0 {
                    if (routed.distance_km - summed_km).abs()
                        > routed.distance_km * DISTANCE_MISMATCH_RATIO
                    {
                        tracing::debug!(
                            "Provider distance {:.2}km differs from path length {:.2}km",
                            routed.distance_km,
                            summed_km
                        );
                    }
                    routed.distance_km
                } else {
                    summed_km
                };
                let distance_from_target_km = (distance_km - half_distance).abs();

                tracing::info!(
                    "Direction {bearing_deg:.0}°, factor {radius_factor:.2}: {distance_km:.2}km (diff {distance_from_target_km:.2}km)"
                );

                let improves = best
                    .as_ref()
                    .is_none_or(|current| distance_from_target_km < current.distance_from_target_km);
                if improves {
                    best = Some(RouteCandidate {
                        bearing_deg,
                        radius_factor,
                        destination,
                        path: routed.path,
                        distance_km,
                        distance_from_target_km,
                    });
                }
            }
        }

        let Some(best) = best else {
            return Err(LoopGenerationError::NoRouteFound { queries_issued });
        };

        tracing::info!(
            "Selected direction {:.0}°, factor {:.2}: {:.2}km after {} queries",
            best.bearing_deg,
            best.radius_factor,
            best.distance_km,
            queries_issued
        );

        Ok(OutRoute {
            path: best.path,
            one_way_distance_km: best.distance_km,
            waypoint: best.destination,
            distance_from_target_km: best.distance_from_target_km,
            bearing_deg: best.bearing_deg,
            radius_factor: best.radius_factor,
            queries_issued,
        })
    }
}

/// Equirectangular projection of `start` by `radius_km` along `bearing_deg`.
///
/// Cheap and only approximate: one degree of latitude is taken as 111 km and
/// longitude degrees shrink with `cos(latitude)`. Latitude is clamped to
/// ±90° and longitude wrapped into [-180, 180].
pub fn project_destination(start: Coordinate, radius_km: f64, bearing_deg: f64) -> Coordinate {
    let bearing = bearing_deg.to_radians();
    let min_lat_scale = MAX_PROJECTION_LATITUDE_DEG.to_radians().cos();
    let lat_scale = start.lat.to_radians().cos().max(min_lat_scale);

    let lat_offset = (radius_km / KM_PER_DEGREE) * bearing.cos();
    let lng_offset = (radius_km / (KM_PER_DEGREE * lat_scale)) * bearing.sin();

    Coordinate {
        lat: (start.lat + lat_offset).clamp(-90.0, 90.0),
        lng: normalize_longitude(start.lng + lng_offset),
    }
}

fn normalize_longitude(lng: f64) -> f64 {
    let mut normalized = lng;
    while normalized < -180.0 {
        normalized += 360.0;
    }
    while normalized > 180.0 {
        normalized -= 360.0;
    }
    normalized
}
