use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokencrush_core::ClientConfig;

#[derive(Parser)]
#[command(name = "tokencrush")]
#[command(version)]
#[command(about = "Shrink prompts with the TokenCrush service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Crush a prompt given as an argument, a file, or on stdin
    Crush(CrushArgs),

    /// Run the workflow on a JSON state read from stdin
    Invoke(InvokeArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
pub struct CrushArgs {
    /// Prompt text (reads stdin when neither this nor --file is given)
    pub prompt: Option<String>,

    /// Read the prompt from a file
    #[arg(short, long, conflicts_with = "prompt")]
    pub file: Option<PathBuf>,

    /// Return the original prompt instead of failing when the service is down
    #[arg(long)]
    pub fallback: bool,

    /// Print the output state as JSON
    #[arg(long)]
    pub json: bool,

    /// Characters of the optimized prompt to show in the report
    #[arg(long, default_value_t = 600)]
    pub preview: usize,

    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Return the original prompt instead of failing when the service is down
    #[arg(long)]
    pub fallback: bool,

    #[command(flatten)]
    pub service: ServiceArgs,
}

/// Connection settings shared by every command that talks to the service.
///
/// Flags override `TOKENCRUSH_API_KEY`, `TC_BASE_URL` and `TC_TIMEOUT_SECS`.
#[derive(Args, Debug, Clone)]
pub struct ServiceArgs {
    /// TokenCrush API key [env: TOKENCRUSH_API_KEY]
    #[arg(long)]
    pub api_key: Option<String>,

    /// Override the service base URL [env: TC_BASE_URL]
    #[arg(long)]
    pub base_url: Option<String>,

    /// Request timeout in seconds [env: TC_TIMEOUT_SECS, default: 30]
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl ServiceArgs {
    pub fn client_config(&self) -> tokencrush_core::Result<ClientConfig> {
        let mut config = ClientConfig::from_env_with_key(self.api_key.clone())?;
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        Ok(config)
    }
}
