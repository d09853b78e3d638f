mod cli;
mod commands;
mod error;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use exn::ResultExt;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if *err == ErrorKind::NotAModpack => {
            eprintln!("{}", *err);
            ExitCode::FAILURE
        },
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config_loader().load().or_raise(|| ErrorKind::Config)?;
    match &cli.command {
        Command::Search { url } => commands::search::run(&config, url).await,
        Command::Download(args) => commands::download::run(&config, &args.url).await,
        Command::Serve { .. } => commands::serve::run(&config).await,
    }
}
