use std::{collections::HashMap, path::PathBuf, time::Duration};

use axum::http::HeaderValue;
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::models::{RoutingProfile, TransportMode};

pub const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_OSRM_TIMEOUT_SECS: u64 = 10;

/// Process configuration. Every flag can also be supplied through the
/// environment variable named next to it.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about = "Out-and-back route generator backed by OSRM")]
pub struct ServerArgs {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Base URL of the OSRM routing service
    #[arg(long, env = "OSRM_BASE_URL", default_value = DEFAULT_OSRM_BASE_URL)]
    pub osrm_base_url: String,

    /// Per-query timeout for OSRM requests, in seconds
    #[arg(long, env = "OSRM_TIMEOUT_SECS", default_value_t = DEFAULT_OSRM_TIMEOUT_SECS)]
    pub osrm_timeout_secs: u64,

    /// Comma-separated list of allowed CORS origins, or `*` for any
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "http://localhost:3000,https://waypoint-vn.vercel.app"
    )]
    pub allowed_origins: String,
}

impl ServerArgs {
    /// Bind the server socket. `host` may be a hostname or a bare IPv6 address.
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind((self.host.as_str(), self.port)).await
    }

    pub fn osrm_config(&self) -> OsrmConfig {
        OsrmConfig::new(&self.osrm_base_url)
            .with_timeout(Duration::from_secs(self.osrm_timeout_secs))
    }

    pub fn cors_layer(&self) -> CorsLayer {
        cors_layer(&self.allowed_origins)
    }
}

/// Load variables from a `.env` file in the working directory or its parents.
///
/// Variables already present in the environment win.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Build the CORS layer from a comma-separated origin list.
///
/// Entries that are not valid header values are skipped with a warning.
pub fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.split(',').any(|origin| origin.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Ignoring invalid CORS origin {origin:?}: {err}");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl OsrmConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_OSRM_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OSRM_BASE_URL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeSettings {
    pub profile: RoutingProfile,
    /// Average speed used for duration estimates only.
    pub speed_kmh: f64,
}

/// Routing profile and speed per transport mode.
///
/// Modes missing from the table resolve to `fallback`.
#[derive(Debug, Clone)]
pub struct TransportTable {
    modes: HashMap<TransportMode, ModeSettings>,
    fallback: ModeSettings,
}

impl TransportTable {
    pub fn new(fallback: ModeSettings) -> Self {
        Self {
            modes: HashMap::new(),
            fallback,
        }
    }

    /// Panics if `speed_kmh` is not strictly positive.
    pub fn with_mode(mut self, mode: TransportMode, settings: ModeSettings) -> Self {
        assert!(
            settings.speed_kmh > 0.0,
            "speed for {mode} must be positive"
        );
        self.modes.insert(mode, settings);
        self
    }

    pub fn settings(&self, mode: TransportMode) -> ModeSettings {
        self.modes.get(&mode).copied().unwrap_or(self.fallback)
    }

    pub fn profile(&self, mode: TransportMode) -> RoutingProfile {
        self.settings(mode).profile
    }

    pub fn speed_kmh(&self, mode: TransportMode) -> f64 {
        self.settings(mode).speed_kmh
    }
}

impl Default for TransportTable {
    fn default() -> Self {
        Self::new(ModeSettings {
            profile: RoutingProfile::Driving,
            speed_kmh: 20.0,
        })
        .with_mode(
            TransportMode::Walking,
            ModeSettings {
                profile: RoutingProfile::Walking,
                speed_kmh: 5.0,
            },
        )
        .with_mode(
            TransportMode::Jogging,
            ModeSettings {
                profile: RoutingProfile::Walking,
                speed_kmh: 8.0,
            },
        )
        .with_mode(
            TransportMode::Cycling,
            ModeSettings {
                profile: RoutingProfile::Cycling,
                speed_kmh: 15.0,
            },
        )
    }
}

/// Sampling grid of the directional search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Compass bearings in degrees, clockwise from north. Outer loop.
    pub bearings_deg: Vec<f64>,
    /// Fractions of the half distance used as projection radius. Inner loop.
    pub radius_factors: Vec<f64>,
    /// Hard cap on provider queries per search.
    pub max_queries: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            bearings_deg: (0..8).map(|step| step as f64 * 45.0).collect(),
            radius_factors: vec![0.8, 1.0],
            max_queries: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_maps_every_mode() {
        let table = TransportTable::default();
        assert_eq!(table.profile(TransportMode::Walking), RoutingProfile::Walking);
        assert_eq!(table.profile(TransportMode::Jogging), RoutingProfile::Walking);
        assert_eq!(table.profile(TransportMode::Cycling), RoutingProfile::Cycling);
        assert_eq!(table.speed_kmh(TransportMode::Walking), 5.0);
        assert_eq!(table.speed_kmh(TransportMode::Jogging), 8.0);
        assert_eq!(table.speed_kmh(TransportMode::Cycling), 15.0);
    }

    #[test]
    fn missing_mode_falls_back_to_driving() {
        let table = TransportTable::new(ModeSettings {
            profile: RoutingProfile::Driving,
            speed_kmh: 20.0,
        });
        assert_eq!(table.profile(TransportMode::Cycling), RoutingProfile::Driving);
        assert_eq!(table.speed_kmh(TransportMode::Cycling), 20.0);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn rejects_non_positive_speed() {
        let _ = TransportTable::default().with_mode(
            TransportMode::Walking,
            ModeSettings {
                profile: RoutingProfile::Walking,
                speed_kmh: 0.0,
            },
        );
    }

    #[test]
    fn default_search_grid_has_sixteen_candidates() {
        let config = SearchConfig::default();
        assert_eq!(
            config.bearings_deg,
            vec![0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]
        );
        assert_eq!(config.radius_factors, vec![0.8, 1.0]);
        assert_eq!(config.max_queries, 16);
    }

    #[test]
    fn osrm_config_strips_trailing_slash() {
        let config = OsrmConfig::new("http://localhost:5000/");
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn binds_hostname_and_ipv6_hosts() {
        let args =
            ServerArgs::try_parse_from(["waypoint-backend", "--host", "localhost", "--port", "0"])
                .unwrap();
        let listener = args.bind().await.unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());

        let args =
            ServerArgs::try_parse_from(["waypoint-backend", "--host", "::1", "--port", "0"])
                .unwrap();
        // hosts without IPv6 support cannot bind ::1 at all
        if let Ok(listener) = args.bind().await {
            assert!(listener.local_addr().unwrap().is_ipv6());
        }
    }

    #[test]
    fn dotenv_file_feeds_args() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "ALLOWED_ORIGINS=https://dotenv.waypoint.test\n").unwrap();
        dotenvy::from_path(&path).unwrap();

        let args = ServerArgs::try_parse_from(["waypoint-backend"]).unwrap();
        assert_eq!(args.allowed_origins, "https://dotenv.waypoint.test");
    }

    #[test]
    fn args_override_from_flags() {
        let args = ServerArgs::try_parse_from([
            "waypoint-backend",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--osrm-timeout-secs",
            "3",
            "--osrm-base-url",
            "http://localhost:5000/",
        ])
        .unwrap();
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9000);
        let osrm = args.osrm_config();
        assert_eq!(osrm.timeout, Duration::from_secs(3));
        assert_eq!(osrm.base_url, "http://localhost:5000");
    }
}
