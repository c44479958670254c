//! # Stockroom Entry Point

use clap::Parser;
use std::process::ExitCode;
use stockroom_cli::cli::Cli;
use stockroom_cli::render::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    stockroom_cli::init_tracing();

    let json = cli.json;
    match stockroom_cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_error(&err, json);
            ExitCode::FAILURE
        }
    }
}
