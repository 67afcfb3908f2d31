//! imgpick — fetch an image from a configurable HTTP API, console front end.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config (fails fast on a missing/invalid API template)
//!   3. Init logger at configured level
//!   4. Build the request template, fetcher, agent and sink
//!   5. Run the console loop until Ctrl-C or EOF

use tokio_util::sync::CancellationToken;
use tracing::info;

use imgpick::{agent::ImageAgent, config, console, error::AppError, fetch::Fetcher,
    logger, request::RequestTemplate, sink::ConsoleSink};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    // Load .env if present — ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;
    logger::init(&config.log_level)?;

    info!(
        api_url = %config.api_url,
        verify_tls = config.verify_tls,
        timeout_seconds = config.timeout_seconds,
        image_dir = %config.image_dir.display(),
        "config loaded"
    );

    let template = RequestTemplate::new(&config.api_url)?;
    let fetcher = Fetcher::new(config.timeout_seconds, config.verify_tls)
        .map_err(|e| AppError::Config(e.to_string()))?;
    let agent = ImageAgent::new(template, fetcher);
    let sink = ConsoleSink::new(&config.image_dir);

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    console::run(agent, sink, shutdown).await
}
