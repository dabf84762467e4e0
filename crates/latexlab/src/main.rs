mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use context::Context;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Doctor { json } => commands::doctor::run(cli.config, json, cli.verbose),
        Commands::Render {
            template,
            data,
            output,
        } => Context::new(cli.config, cli.verbose)
            .and_then(|ctx| commands::render::run(&ctx, &template, &data, output.as_deref())),
        Commands::Compile {
            template,
            output,
            data,
            engine,
            max_passes,
            timeout,
        } => Context::new(cli.config, cli.verbose).and_then(|ctx| {
            let overrides = commands::compile::Overrides {
                engine,
                max_passes,
                timeout,
            };
            commands::compile::run(ctx, &template, &data, &output, overrides)
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`, `debug` with `--verbose`)
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .init();
}
