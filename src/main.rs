mod answer;
mod client;
mod config;
mod error;
mod handlers;
mod logger;
mod metrics;
mod models;
mod prompt;

use std::sync::Arc;
use tokio::net::TcpListener;
use reqwest::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use answer::{AnswerService, PromptRelay, SampleAnswers};
use config::{Backend, RelayConfig};
use logger::RequestLog;
use metrics::Metrics;

// shared by every handler. the http client lives inside the relay so
// connections are pooled across requests
#[derive(Clone)]
pub struct AppState {
    pub answers: Arc<dyn AnswerService>,
    pub metrics: Arc<Metrics>,
    pub request_log: RequestLog
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {

    dotenvy::dotenv().ok();

    init_tracing();

    let config = Arc::new(RelayConfig::from_env()?);

    let answers: Arc<dyn AnswerService> = match config.backend {
        Backend::OpenAi => {
            if config.api_key.is_none() {
                warn!("OPENAI_API_KEY is not set, the completion service will reject requests");
            }
            Arc::new(PromptRelay::new(Client::new(), config.clone()))
        }
        Backend::Sample => Arc::new(SampleAnswers::new(config.sample_delay)),
    };

    let state = AppState {
        answers,
        metrics: Arc::new(Metrics::new()),
        request_log: RequestLog::new(config.log_path.clone())
    };

    info!(
        backend = ?config.backend,
        model = state.answers.model(),
        log_path = %state.request_log.path().display(),
        "starting policy relay"
    );

    let app = handlers::router(state);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())

}

fn init_tracing() {

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("tracing already initialized: {}", e);
    }

}

async fn shutdown_signal() {

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {}", e);
        // never resolve, keep serving
        std::future::pending::<()>().await;
    }

}
