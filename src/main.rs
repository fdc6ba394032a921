use ski_stay::config::Settings;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration before logging so its defaults can apply
    let settings = Settings::load();

    // Initialize logging, environment first
    let (config_level, config_format) = match &settings {
        Ok(s) => (s.logging.level.clone(), s.logging.format.clone()),
        Err(_) => ("info".to_string(), "compact".to_string()),
    };
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(config_level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(config_format);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }

    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting ski-stay ranking run...");

    match ski_stay::job::run(&settings).await {
        Ok(report) => {
            info!(
                "Ranked {} listings into {}",
                report.summary.scored,
                report.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
