use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use tessera::api::{create_router, AppState};
use tessera::cli::Args;
use tessera::config::{Config, LogFormat};
use tessera::ocr::{load_engine_settings, OcrEngine, TesseractEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::from_env();

    dotenvy::dotenv().ok();

    let log_format = LogFormat::from_env();
    init_tracing(log_format.clone().unwrap_or(LogFormat::Text));
    if let Err(e) = log_format {
        tracing::warn!("Invalid TESSERA_LOG_FORMAT: {}. Using text.", e);
    }

    let mut config = Config::from_env();
    args.apply(&mut config);

    tracing::info!("Loading engine configuration...");
    let settings =
        load_engine_settings(&config.ocr).context("Failed to load engine configuration")?;

    tracing::info!(
        languages = %settings.tesseract.languages,
        text_score = settings.global.text_score,
        "Initializing OCR engine..."
    );
    let engine: Arc<dyn OcrEngine> =
        Arc::new(TesseractEngine::new(settings).context("Failed to initialize OCR engine")?);

    let addr = config.server.addr();
    let state = AppState::new(config, engine);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Tessera starting on http://{}", addr);
    tracing::info!("  Health check: http://{}/", addr);
    tracing::info!("  OCR endpoint: http://{}/ocr", addr);
    tracing::info!("  API docs:     http://{}/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Tessera stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let fmt_layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera=info,tower_http=debug".into()),
        )
        .with(fmt_layer)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
