//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// Longest session lifetime accepted on the command line (ten years)
pub const MAX_SESSION_TTL_MINUTES: i64 = 10 * 365 * 24 * 60;

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "study-buddy")]
#[command(about = "Dashboard backend for the StudyBuddy study-session tracker")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "8787")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Milliseconds between timer ticks
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Lifetime of sessions issued by the built-in auth service, in minutes
    #[arg(
        long,
        default_value = "60",
        value_parser = clap::value_parser!(i64).range(1..=MAX_SESSION_TTL_MINUTES)
    )]
    pub session_ttl_minutes: i64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_ttl_minutes)
    }
}
