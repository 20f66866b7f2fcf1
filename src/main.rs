//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run UI.
//! No business logic here; analysis is delegated to AnalysisService.

use dotenv::dotenv;
use solar_assist::adapters::ai::{MockAiAdapter, OpenAiAdapter};
use solar_assist::adapters::ui::web::{WebState, WebUi};
use solar_assist::domain::ApiCredential;
use solar_assist::ports::{AiPort, InputPort};
use solar_assist::shared::config::AppConfig;
use solar_assist::usecases::AnalysisService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config could not be loaded, using defaults");
        AppConfig::default()
    });

    // --- Fallback credential (form field wins when filled in) ---
    let fallback_key = match cfg.ai_api_key().map(ApiCredential::new).transpose() {
        Ok(key) => key,
        Err(e) => {
            warn!(error = %e, "ignoring configured API key");
            None
        }
    };
    if fallback_key.is_some() {
        info!("API key loaded from environment");
    } else {
        info!("no API key in environment; the form will ask for one");
    }

    // --- AI adapter ---
    let ai_adapter: Arc<dyn AiPort> = if cfg.is_mock_ai() {
        warn!("SOLAR_ASSIST_MOCK_AI set, using mock AI adapter");
        Arc::new(MockAiAdapter::new())
    } else {
        info!(
            model = %cfg.ai_model_or_default(),
            url = %cfg.ai_api_url_or_default(),
            "AI analysis enabled with OpenAI-compatible adapter"
        );
        Arc::new(
            OpenAiAdapter::new(cfg.ai_api_url_or_default(), cfg.ai_model_or_default())
                .with_max_tokens(cfg.ai_max_tokens_or_default())
                .with_temperature(cfg.ai_temperature_or_default()),
        )
    };

    // --- Services ---
    let analysis_service = Arc::new(AnalysisService::new(ai_adapter));

    let bind_addr = cfg.bind_addr();
    let max_upload_bytes = cfg.max_upload_bytes_or_default();
    info!(max_upload_bytes, "upload limit: {} bytes", max_upload_bytes);

    solar_assist::adapters::ui::init_ui(&format!("http://{}", bind_addr));

    let input_port: Arc<dyn InputPort> = Arc::new(WebUi::new(
        WebState::new(analysis_service, fallback_key),
        bind_addr,
        max_upload_bytes,
    ));

    // --- Run (form -> analyze -> report, until Ctrl+C) ---
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
