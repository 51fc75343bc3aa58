use std::{env, io, process::ExitCode};

use tracing::Level;
use tracing_subscriber::EnvFilter;

use ncov_ical::{cli, run};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // stdout carries the calendar, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = cli::parse(env::args().skip(1).collect());

    // errors have already been logged where they occurred
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
