use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use transcorder::report;
use transcorder::{create_router, AppState, Config, Pipeline, TranscriptionClient};

#[derive(Parser, Debug)]
#[command(name = "transcorder")]
#[command(about = "Meeting transcription and report service")]
struct Args {
    /// Path to the configuration file, without extension
    #[arg(long, default_value = "config/transcorder")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads provider keys from the environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    if let Some(port) = args.port {
        cfg.service.http.port = port;
    }

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!(
        "Transcription: {} via {}",
        cfg.transcription.model, cfg.transcription.base_url
    );

    let transcriber = TranscriptionClient::from_env(&cfg.transcription);
    if !transcriber.has_api_key() {
        warn!("GROQ_API_KEY is not set; transcription requests will fail until it is");
    }

    let generator = report::from_config(&cfg.report);
    info!(
        "Report backend: {} ({})",
        generator.name(),
        cfg.report.model
    );
    if !generator.has_api_key() {
        warn!(
            "No API key for the {} report backend; report requests will fail until it is set",
            generator.name()
        );
    }

    let pipeline = Pipeline::new(transcriber, generator);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let state = AppState::new(cfg, pipeline);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
