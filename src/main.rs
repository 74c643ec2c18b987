//! prune - content database slimming CLI

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use prune::Result;
use prune::app::AppContext;
use prune::cli::output::Reporter;
use prune::cli::{Cli, OutputFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config decides the output format, so it loads before tracing starts.
    let (reporter, result) = match AppContext::from_cli(&cli) {
        Ok(ctx) => {
            init_tracing(&cli, ctx.reporter.format());
            (ctx.reporter, run(&cli, &ctx))
        }
        Err(e) => {
            let reporter = Reporter::new(cli.output_format(), true);
            init_tracing(&cli, reporter.format());
            (reporter, Err(e))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(target: "prune", code = e.code(), error = ?e, "command failed");
            reporter.error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, ctx: &AppContext) -> Result<()> {
    prune::cli::commands::run(ctx, &cli.command)
}

fn init_tracing(cli: &Cli, format: OutputFormat) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,prune=info",
        1 => "info,prune=debug",
        2 => "debug,prune=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if format == OutputFormat::Robot {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
