//! KISAN MITRA — AI-assisted farming companion service.
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the prompt gateway and weather client, and serves the HTTP
//! API with graceful shutdown.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use kisan_mitra::config;
use kisan_mitra::flows::Assistant;
use kisan_mitra::llm::gemini::GeminiClient;
use kisan_mitra::llm::PromptGateway;
use kisan_mitra::normalize::{Normalizer, RewriteMode};
use kisan_mitra::server;
use kisan_mitra::server::routes::ServerState;
use kisan_mitra::weather::WeatherClient;

const BANNER: &str = r#"
 _  _____ ____    _    _   _   __  __ ___ _____ ____      _
| |/ /_ _/ ___|  / \  | \ | | |  \/  |_ _|_   _|  _ \    / \
| ' / | |\___ \ / _ \ |  \| | | |\/| || |  | | | |_) |  / _ \
| . \ | | ___) / ___ \| |\  | | |  | || |  | | |  _ <  / ___ \
|_|\_\___|____/_/   \_\_| \_| |_|  |_|___| |_| |_| \_\/_/   \_\

  Your farming companion — prices, advice, schemes and weather
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = config::AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        assistant_name = %cfg.assistant.name,
        model = %cfg.llm.model,
        port = cfg.server.port,
        "KISAN MITRA starting up"
    );

    // -- Prompt gateway ---------------------------------------------------

    let gateway: Option<Arc<dyn PromptGateway>> =
        match config::AppConfig::resolve_secret(&cfg.llm.api_key_env) {
            Some(key) => {
                info!(provider = %cfg.llm.provider, model = %cfg.llm.model, "Prompt gateway ready");
                Some(Arc::new(GeminiClient::new(
                    key,
                    Some(cfg.llm.model.clone()),
                    Some(cfg.llm.max_output_tokens),
                )?))
            }
            None => {
                warn!(
                    env = %cfg.llm.api_key_env,
                    "No gateway API key configured — price lookups will return a config-error notice"
                );
                None
            }
        };

    // -- Weather client ---------------------------------------------------

    let weather_key = config::AppConfig::resolve_secret(&cfg.weather.api_key_env);
    if weather_key.is_none() {
        warn!(
            env = %cfg.weather.api_key_env,
            "No weather API key configured — weather lookups will return no data"
        );
    }
    let weather = WeatherClient::new(weather_key, &cfg.weather.units)?;

    // -- Assistant --------------------------------------------------------

    let mode = if cfg.normalizer.cascade {
        RewriteMode::FixedPoint {
            max_passes: cfg.normalizer.max_passes,
        }
    } else {
        RewriteMode::SinglePass
    };
    let assistant = Assistant::new(gateway, Normalizer::new(mode));

    // -- Serve ------------------------------------------------------------

    if !cfg.server.enabled {
        warn!("Server disabled in config — nothing to do");
        return Ok(());
    }

    let state = Arc::new(ServerState::new(assistant, weather, cfg.assistant.name.clone()));
    server::serve(state, cfg.server.port).await
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kisan_mitra=info"));

    let json_logging = std::env::var("KISAN_MITRA_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
