//! Storyreel assembly binary.
//!
//! Usage: `storyreel <run-config.json>` (or set `STORYREEL_CONFIG`).

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storyreel_pipeline::{run, RunConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("storyreel=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    if let Err(e) = try_main().await {
        error!("run failed: {e:#}");
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("STORYREEL_CONFIG").ok())
        .context("usage: storyreel <run-config.json>")?;

    info!(config = %config_path, "loading run config");
    let config = RunConfig::load(&config_path)
        .await
        .with_context(|| format!("loading {config_path}"))?;

    let report = run(&config).await.context("assembly run")?;

    info!(
        run_id = %report.run_id,
        segments = report.segments.len(),
        duration_ms = report.composite.duration_ms,
        output = %report.final_video.display(),
        "done"
    );
    Ok(())
}
