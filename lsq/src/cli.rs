use clap::Parser;

/// Drives the search-bar filter language from a terminal.
#[derive(Parser)]
pub struct Cli {
    #[clap(long, default_value = "false")]
    /// Print parts and filter sets as JSON.
    pub json: bool,
    #[clap(long, default_value = "false")]
    /// Read calendar dates in UTC instead of the system time zone.
    pub utc: bool,
    #[clap(long, default_value = "warn")]
    /// Log filter used when RUST_LOG is not set.
    pub log_level: String,
    #[clap(long)]
    /// Search-bar contents to start from.
    pub query: Option<String>,
}
