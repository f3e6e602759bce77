use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_core::config::RunConfig;
use roster_core::{pipeline, RunContext};

fn main() -> Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting roster-core...");

    let mut args = std::env::args().skip(1);
    let year: i32 = args
        .next()
        .context("missing argument: year")?
        .parse()
        .context("year must be an integer")?;
    let month: u32 = args
        .next()
        .context("missing argument: month")?
        .parse()
        .context("month must be an integer")?;
    let input_dir: PathBuf = args.next().context("missing argument: input_dir")?.into();
    let output_dir: PathBuf = args.next().context("missing argument: output_dir")?.into();

    let config = RunConfig::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "failed to load config, falling back to built-in defaults");
        RunConfig::default()
    });
    tracing::info!(?config, "configuration loaded");

    let ctx = RunContext {
        year,
        month,
        input_dir,
        output_dir,
        config,
    };

    let outcome = pipeline::run(&ctx)?;
    tracing::info!(exit_code = outcome.exit_code, "roster-core finished");

    Ok(ExitCode::from(outcome.exit_code as u8))
}
