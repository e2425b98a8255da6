//! Voice companion HTTP server
//!
//! Main entry point for the relay.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::VoiceChatService;
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, ConfigWarning, DashScopeInferenceAdapter, OssAudioPublisher, SpeechAdapter,
};
use presentation_http::{
    handlers::metrics::MetricsCollector,
    routes,
    state::{AppState, FallbackAudio},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "companion_server=debug,presentation_http=debug,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let dotenv = dotenvy::dotenv();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(config.server.json_logs());

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }
    info!("🎙️ Voice companion v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(problems) = config.validate() {
        tracing::error!(%problems, "Configuration is not usable");
        anyhow::bail!("invalid configuration: {problems}");
    }
    log_warnings(&config.endpoint_warnings());

    info!(
        host = %config.server.host,
        port = %config.server.port,
        bucket = %config.storage.bucket,
        generation_model = %config.generation.default_model,
        stt_model = %config.speech.stt_model,
        tts_model = %config.speech.tts_model,
        "Configuration loaded"
    );

    let api_key = config
        .dashscope
        .api_key
        .clone()
        .context("DashScope API key is not configured")?;

    let publisher = OssAudioPublisher::new(&config.storage)?;
    let speech = Arc::new(SpeechAdapter::new(
        config.speech.clone(),
        api_key.clone(),
        &config.synthesis,
    )?);
    let generator = DashScopeInferenceAdapter::new(config.generation.clone(), api_key)?;

    let voice_chat = VoiceChatService::new(
        Arc::new(publisher),
        speech.clone(),
        Arc::new(generator),
        speech,
    );

    let state = AppState {
        voice_chat: Arc::new(voice_chat),
        metrics: Arc::new(MetricsCollector::new()),
        fallback_audio: FallbackAudio::new(
            config.synthesis.fallback_file.clone(),
            config.synthesis.fallback_public_path.clone(),
        ),
        max_upload_bytes: config.server.max_body_size_audio_bytes,
    };

    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server.allowed_origins));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("👋 Server shutdown complete");

    Ok(())
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn log_warnings(warnings: &[ConfigWarning]) {
    for warning in warnings {
        warn!(
            severity = %warning.severity,
            code = %warning.code,
            recommendation = %warning.recommendation,
            "{}",
            warning.message
        );
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for connections to close...", timeout);
}
