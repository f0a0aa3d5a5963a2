use chrono::NaiveDate;
use clap::Parser;

/// Terminal dashboard for the MyStat student portal.
///
/// Credentials come from MYSTAT_LOGIN/MYSTAT_PASSWORD (or MYSTAT_TOKEN),
/// read from the environment or a .env file.
#[derive(Debug, Parser)]
#[command(name = "mystat", version, about)]
pub struct Cli {
    /// Print the home summary to stdout instead of opening the dashboard
    #[arg(long)]
    pub plain: bool,

    /// Anchor date for the week schedule (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// Override the data API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Override the login endpoint URL
    #[arg(long, value_name = "URL")]
    pub auth_url: Option<String>,
}
