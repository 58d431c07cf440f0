mod cli;
mod commands;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Crush(args) => commands::crush::run(args).await,
        Commands::Invoke(args) => commands::invoke::run(args).await,
        Commands::Version => {
            print!("{}", Cli::command().render_version());
            Ok(())
        }
    }
}
