use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use courtside_runner::config::RunnerConfig;
use courtside_runner::run_headless;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("COURTSIDE_LOG_JSON")
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    tracing::info!("Courtside runner starting");

    let config = RunnerConfig::load();
    let box_score = match run_headless(config).await {
        Ok(score) => score,
        Err(e) => {
            tracing::error!(error = %e, "Match aborted");
            return ExitCode::FAILURE;
        },
    };

    match serde_json::to_string_pretty(&box_score) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to render box score");
            ExitCode::FAILURE
        },
    }
}
