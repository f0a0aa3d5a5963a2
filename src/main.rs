use anyhow::{Context, Result};
use clap::Parser;
use mystat_dashboard::cli::Cli;
use mystat_dashboard::config::{AuthSource, Config};
use mystat_dashboard::logging::{self, LogTarget};
use mystat_dashboard::ui::App;
use mystat_dashboard::{Dashboard, MyStatClient};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    config.override_endpoints(cli.base_url, cli.auth_url);

    let target = if cli.plain {
        LogTarget::Stderr
    } else {
        LogTarget::File(&config.log_file)
    };
    let _log_guard = logging::init(&config.log_filter, target)?;

    info!(base_url = %config.endpoints.base_url, "Starting MyStat dashboard");

    // Initialize API client
    let endpoints = config.endpoints.clone();
    let client = match config.auth {
        AuthSource::Credentials(credentials) => {
            MyStatClient::with_credentials(endpoints, &credentials).await
        }
        AuthSource::Token(token) => MyStatClient::with_token(endpoints, token),
    }
    .context("Failed to initialize MyStat client")?;

    if !client.is_authenticated() {
        warn!("Continuing without a token; sections will show placeholders");
    }

    let date = cli.date.unwrap_or_else(|| chrono::Local::now().date_naive());

    if cli.plain {
        let dashboard = Dashboard::load(&client, date).await;
        print!("{}", dashboard.home_text());
        return Ok(());
    }

    // Start TUI application
    let mut app = App::new(client, date);
    app.run().await?;

    Ok(())
}
