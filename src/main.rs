use ai_llm_service::telemetry;
use anyhow::Context;
use tracing::{Level, info};
use tracing_subscriber::{Layer, filter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` is optional; a present but unreadable/invalid file is an error.
    let dotenv = match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(e) if e.not_found() => None,
        Err(e) => return Err(e).context("failed to load .env"),
    };

    let filter = telemetry::env_filter_with_level("warn", Level::INFO);
    let third_party = fmt::layer()
        .with_target(true)
        .with_filter(filter::filter_fn(|meta| {
            !telemetry::is_workspace_target(meta.target())
        }));

    tracing_subscriber::registry()
        .with(filter)
        .with(telemetry::layer())
        .with(third_party)
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Some(path) = dotenv {
        info!(path = %path.display(), "loaded .env");
    }

    api::start().await.context("server terminated with an error")?;

    Ok(())
}
