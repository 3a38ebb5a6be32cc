mod app;

use std::process::ExitCode;

use clap::Parser;

use app::Cli;

fn main() -> ExitCode {
    env_logger::init();

    match app::run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
