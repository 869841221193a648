mod cli;
mod handlers;

use clap::{Parser, Subcommand};
use fnkit_core::config::ToolkitConfig;
use fnkit_core::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "fnkit",
    version,
    about = "fnkit: request context toolkit for serverless HTTP functions"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the built-in echo function against a synthetic request
    Invoke(cli::invoke::InvokeArgs),

    /// Print the configuration resolved from the environment
    Env,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ToolkitConfig::from_env()?;

    match cli.command {
        Command::Env => cli::env::run(&config),

        Command::Invoke(args) => {
            init_logging(&config)?;
            cli::invoke::run(args, &config)
        }
    }
}
