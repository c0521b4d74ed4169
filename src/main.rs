mod bot;

use anyhow::Result;
use tracing_subscriber::{fmt, EnvFilter};

use guardrail_bot::config::Config;
use guardrail_bot::exchange::PaperAdapter;

use crate::bot::GuardrailBot;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .init();

    let adapter = Box::new(PaperAdapter::new());
    let shared_config = cfg.shared();

    let mut bot = GuardrailBot::new(shared_config, adapter).await;
    bot.run().await?;

    Ok(())
}
