//! parse-it command line entry point.
//!
//! Resolves configuration keys with the library and prints the result. Errors from
//! the resolver are printed to stderr as a JSON report with a stable error code.

use anyhow::Result;
use clap::Parser;
use parse_it::cli::{Cli, Command, split_pair};
use parse_it::config::{BulkLookup, Lookup, Resolver};
use parse_it::error::{ErrorReport, ResolveError};
use parse_it::format::render;
use parse_it::sources::ProcessContext;
use serde_json::Value;
use std::fs::OpenOptions;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("error: failed to initialize logging: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<ResolveError>() {
                Some(resolve_err) => {
                    let report = ErrorReport::from(resolve_err);
                    match serde_json::to_string(&report) {
                        Ok(json) => eprintln!("{}", json),
                        Err(_) => eprintln!("error: {}", resolve_err),
                    }
                }
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on the --log option. `RUST_LOG` overrides the level.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };

    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_env_filter(filter())
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<String> {
    let config = cli.resolver_config()?;
    let context = ProcessContext::from_env().with_args(cli.passthrough_args().iter().cloned());
    debug!(args = context.args().len(), "Captured process context");
    let resolver = Resolver::with_context(config, context)?;

    match &cli.command {
        Command::Get(args) => {
            let mut lookup = Lookup::new();
            if let Some(default) = &args.default {
                lookup = lookup.with_default(Value::String(default.clone()));
            }
            if args.required {
                lookup = lookup.required();
            }
            for value_type in &args.allow {
                lookup = lookup.allow(*value_type);
            }

            if let [key] = args.keys.as_slice() {
                let value = resolver.resolve_one(key, &lookup)?;
                render(&value, cli.format)
            } else {
                let values = resolver.resolve_many(&args.keys, &lookup)?;
                render(&values, cli.format)
            }
        }
        Command::All(args) => {
            let mut lookup = BulkLookup::new();
            for raw in &args.defaults {
                let (key, value) = split_pair(raw).ok_or_else(|| {
                    anyhow::anyhow!("invalid --default '{}', expected KEY=VALUE", raw)
                })?;
                lookup = lookup.with_default(key, Value::String(value.to_string()));
            }
            for key in &args.require {
                lookup = lookup.require(key.clone());
            }
            let values = resolver.resolve_all(&lookup)?;
            render(&values, cli.format)
        }
        Command::Files => render(resolver.discovered_files(), cli.format),
    }
}
