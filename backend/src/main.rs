use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_backend::{
    AppState,
    config::{SearchConfig, ServerArgs, TransportTable, load_dotenv},
    create_router,
    loops::RouteGenerator,
    osrm::OsrmClient,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_path = load_dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waypoint_backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Some(path) = dotenv_path {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let args = ServerArgs::parse();

    let client = OsrmClient::new(args.osrm_config())?;
    tracing::info!(
        "Routing through OSRM at {} (timeout {}s)",
        client.base_url(),
        args.osrm_timeout_secs
    );

    let generator = RouteGenerator::new(client, TransportTable::default(), SearchConfig::default());
    let app = create_router(AppState::new(generator)).layer(args.cors_layer());

    let listener = args.bind().await?;
    tracing::info!("Starting backend on http://{}", listener.local_addr()?);
    tracing::info!("API endpoints:");
    tracing::info!("  POST /generate-route - Generate an out-and-back route");
    tracing::info!("  GET /health - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}
