use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use tokio::sync::watch;

use scanwatch::cli::Cli;
use scanwatch::logging::init_logging;
use scanwatch::{resolve_settings, Dispatcher, DispatcherConfig, Pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Starting scanwatch v{}", env!("CARGO_PKG_VERSION"));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> scanwatch::Result<()> {
    let settings = resolve_settings(cli.load_config()?)?;

    match settings.max_concurrent_jobs {
        Some(max) => info!("Running at most {} jobs at once", max),
        None => warn!("No job limit configured; every watch event starts its own job"),
    }

    let pipeline = Arc::new(Pipeline::from_settings(&settings));
    let dispatcher = Dispatcher::new(DispatcherConfig::from_settings(&settings), pipeline);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        let _ = shutdown_tx.send(true);
    })?;

    dispatcher.run(shutdown_rx).await?;
    Ok(())
}
