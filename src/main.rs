//! EndoMatch HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use endomatch::audit::{Auditor, GenaiAuditClient, RetryPolicy};
use endomatch::config::Config;
use endomatch::embedding::HttpEmbedder;
use endomatch::gateway::{HandlerState, create_router_with_state};
use endomatch::pipeline::MatchPipeline;
use endomatch::trialstore::QdrantTrialStore;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
███████╗███╗   ██╗██████╗  ██████╗ ███╗   ███╗ █████╗ ████████╗ ██████╗██╗  ██╗
██╔════╝████╗  ██║██╔══██╗██╔═══██╗████╗ ████║██╔══██╗╚══██╔══╝██╔════╝██║  ██║
█████╗  ██╔██╗ ██║██║  ██║██║   ██║██╔████╔██║███████║   ██║   ██║     ███████║
██╔══╝  ██║╚██╗██║██║  ██║██║   ██║██║╚██╔╝██║██╔══██║   ██║   ██║     ██╔══██║
███████╗██║ ╚████║██████╔╝╚██████╔╝██║ ╚═╝ ██║██║  ██║   ██║   ╚██████╗██║  ██║
╚══════╝╚═╝  ╚═══╝╚═════╝  ╚═════╝ ╚═╝     ╚═╝╚═╝  ╚═╝   ╚═╝    ╚═════╝╚═╝  ╚═╝

        SCREEN. AUDIT. MATCH.
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr = SocketAddr::new(config.bind_addr, config.port);

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        top_k = config.top_k,
        "EndoMatch starting"
    );

    let embedder = HttpEmbedder::new(
        config.embeddings_url.clone(),
        config.embeddings_model.clone(),
        config.embeddings_api_key.clone(),
        config.embedding_dim,
    );

    let store = QdrantTrialStore::connect(&config.qdrant_url, config.collection.clone(), embedder)?;

    let audit_client = GenaiAuditClient::new(config.audit_model.clone());
    let auditor = Auditor::new(audit_client, RetryPolicy::default());

    let pipeline = MatchPipeline::new(Arc::new(store), Arc::new(auditor), config.top_k);
    let state = HandlerState::new(Arc::new(pipeline));

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("EndoMatch shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("ENDOMATCH_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8000);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build runtime");

    rt.block_on(async {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .expect("failed to build client");

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
