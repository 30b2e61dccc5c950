//! Command-line arguments.

use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "threadroom",
    version,
    about = "Terminal client for discussion topic rooms",
    long_about = None
)]
/// Command-line flags. Each one overrides the config file.
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Base URL of the discussion server API.
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Bearer token for the API.
    #[arg(long, env = "THREADROOM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Topic to join. Defaults to the last visited topic.
    #[arg(short, long, value_name = "ID")]
    pub topic: Option<u64>,

    /// Feed polling period in milliseconds.
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,
}
