//! Caevo CLI - temporal relation extraction from the command line.

use anyhow::Context;
use caevo_cli::commands;
use caevo_cli::{Cli, Command, Formatter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Relations => commands::execute_relations(&formatter)?,
        Command::Closure(args) => {
            let input = args.input.display().to_string();
            commands::execute_closure(args, &formatter).with_context(|| format!("closing {}", input))?
        }
        Command::Reduce(args) => {
            let input = args.input.display().to_string();
            commands::execute_reduce(args, &formatter).with_context(|| format!("reducing {}", input))?
        }
        Command::Run(args) => {
            let input = args.input.display().to_string();
            commands::execute_run(args, &formatter)
                .await
                .with_context(|| format!("running pipeline over {}", input))?
        }
    }

    Ok(())
}
