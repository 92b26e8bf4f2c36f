// tlscan - probe host/port targets for HTTPS/HTTP support

use clap::Parser;
use std::process::ExitCode;
use tlscan::cli::Args;
use tlscan::output::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match tlscan::runner::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
