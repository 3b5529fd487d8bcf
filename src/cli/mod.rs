// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod check_model;
pub mod serve;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::ServiceConfig;

pub use check_model::{check_model, inspect_checkpoint, CheckModelArgs, CheckpointReport};
pub use serve::{serve, ServeArgs};

/// Crop Disease Detector CLI
#[derive(Parser, Debug)]
#[command(name = "crop-disease-detector")]
#[command(version)]
#[command(about = "Crop leaf disease detection service", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP service
    Serve(ServeArgs),

    /// Inspect a checkpoint directory
    CheckModel(CheckModelArgs),
}

/// Build the log filter
///
/// `RUST_LOG` directives win; otherwise `debug` or `info` depending on `debug`.
pub fn log_filter(rust_log: Option<&str>, debug: bool) -> EnvFilter {
    rust_log
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if debug { "debug" } else { "info" }))
}

/// Initialize the tracing subscriber
pub fn init_tracing(debug: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(rust_log.as_deref(), debug);

    // A second init (tests, embedding) is not an error
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Serve(args) => {
            let mut config = ServiceConfig::from_env();
            args.apply(&mut config);
            config.validate()?;
            init_tracing(config.debug);
            serve(config).await
        }
        Commands::CheckModel(args) => {
            init_tracing(false);
            check_model(args)
        }
    }
}
