use std::future::Future;

use serde::Deserialize;

use crate::{
    config::OsrmConfig,
    models::{Coordinate, RoutedPath, RoutingProfile},
};

/// Road routing capability used by the directional search.
///
/// Implementations never fail loudly: any network, status or decoding
/// problem is reported as `None` so the caller can move on to the next
/// candidate. Returned paths are in (lat, lng) order.
pub trait RouteProvider: Send + Sync {
    fn route(
        &self,
        start: Coordinate,
        dest: Coordinate,
        profile: RoutingProfile,
    ) -> impl Future<Output = Option<RoutedPath>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the OSRM `route/v1` HTTP service.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn route_url(&self, start: Coordinate, dest: Coordinate, profile: RoutingProfile) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, profile, start.lng, start.lat, dest.lng, dest.lat
        )
    }

    async fn fetch(
        &self,
        start: Coordinate,
        dest: Coordinate,
        profile: RoutingProfile,
    ) -> Result<Option<RoutedPath>, ProviderError> {
        let url = self.route_url(start, dest, profile);
        tracing::debug!("OSRM query {url}");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_route_body(&body)
    }
}

impl RouteProvider for OsrmClient {
    async fn route(
        &self,
        start: Coordinate,
        dest: Coordinate,
        profile: RoutingProfile,
    ) -> Option<RoutedPath> {
        match self.fetch(start, dest, profile).await {
            Ok(routed) => routed,
            Err(err) => {
                tracing::warn!("OSRM route {profile} query failed: {err}");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    #[serde(default)]
    geometry: Option<OsrmGeometry>,
    /// Meters.
    #[serde(default)]
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

impl From<OsrmRoute> for RoutedPath {
    fn from(route: OsrmRoute) -> Self {
        // GeoJSON positions are [lng, lat]
        let path = route
            .geometry
            .map(|geometry| {
                geometry
                    .coordinates
                    .into_iter()
                    .filter_map(|position| match position.as_slice() {
                        [lng, lat, ..] => Some(Coordinate { lat: *lat, lng: *lng }),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let distance_km = route
            .distance
            .filter(|meters| meters.is_finite() && *meters > 0.0)
            .map(|meters| meters / 1000.0)
            .unwrap_or(0.0);

        Self { path, distance_km }
    }
}

/// Decode an OSRM route response and keep its first alternative.
///
/// Missing geometry yields an empty path and a missing distance yields 0.0;
/// only an unreadable body or an empty `routes` list gives nothing.
pub(crate) fn parse_route_body(body: &str) -> Result<Option<RoutedPath>, ProviderError> {
    let response: OsrmRouteResponse = serde_json::from_str(body)?;
    Ok(response.routes.into_iter().next().map(RoutedPath::from))
}
