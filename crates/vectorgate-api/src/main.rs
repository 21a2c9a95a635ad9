use std::env;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vectorgate_api::create_router;
use vectorgate_api::AppState;
use vectorgate_core::config::ConnectorConfig;
use vectorgate_store::memory::MemoryIndex;
use vectorgate_store::ports::DocumentIndex;
use vectorgate_store::qdrant::QdrantIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vectorgate_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = ConnectorConfig::default();
    if let Ok(path) = env::var("VECTORGATE_CONFIG") {
        config = config.load_from_file(&path)?;
    }
    let config = config.load_from_env();
    config.validate()?;

    let listen_port: u16 =
        env::var("VECTORGATE_LISTEN_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);

    tracing::info!(
        listen_port = listen_port,
        collection = %config.collection,
        distance = config.distance.as_str(),
        "Starting vectorgate API server"
    );

    // Select the storage backend; Qdrant unless explicitly overridden
    let index: Arc<dyn DocumentIndex> = match env::var("VECTORGATE_BACKEND").as_deref() {
        Ok("memory") => {
            tracing::info!("Using in-memory index (unset VECTORGATE_BACKEND for Qdrant)");
            Arc::new(MemoryIndex::new(config.distance))
        }
        _ => {
            tracing::info!(url = %config.url(), "Connecting to Qdrant...");
            match QdrantIndex::connect(config.clone()).await {
                Ok(index) => {
                    tracing::info!("Connected to Qdrant");
                    Arc::new(index)
                }
                Err(e) => {
                    tracing::error!("Failed to connect to Qdrant: {}", e);
                    tracing::error!(
                        "Remediation:\n\
                        1. Ensure Qdrant is running\n\
                        2. Verify VECTORGATE_HOST and VECTORGATE_PORT point at the gRPC port\n\
                        3. Check that VECTORGATE_DIM is set for a new collection\n\
                        4. Set VECTORGATE_BACKEND=memory for a local in-memory index"
                    );
                    std::process::exit(1);
                }
            }
        }
    };

    let state = Arc::new(AppState::new(index, &config));

    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    let app = create_router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let addr = format!("0.0.0.0:{}", listen_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
