use crate::config::{AppConfig, LogFormat};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "grocy-frame")]
#[command(about = "Shopping-list front end for Grocy, made to be embedded in Home Assistant")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, env = "GROCY_FRAME_CONFIG")]
    pub config: Option<String>,

    /// Listening host
    #[arg(long)]
    pub host: Option<String>,

    /// Listening port (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Grocy base URL, e.g. http://grocy:9283
    #[arg(long)]
    pub grocy_url: Option<String>,

    /// Grocy API key
    #[arg(long, env = "GROCY_API_KEY", hide_env_values = true)]
    pub grocy_api_key: Option<String>,

    /// Pause after deletions, in milliseconds
    #[arg(long)]
    pub settle_delay_ms: Option<u64>,

    /// Emit JSON logs
    #[arg(long)]
    pub log_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Validate configuration and exit
    #[arg(long)]
    pub check_config: bool,
}

impl CliArgs {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.grocy_url {
            config.grocy.url = url.clone();
        }
        if let Some(key) = &self.grocy_api_key {
            config.grocy.api_key = key.clone();
        }
        if let Some(delay) = self.settle_delay_ms {
            config.sync.settle_delay_ms = delay;
        }
        if self.log_json {
            config.logging.format = LogFormat::Json;
        }
    }
}
