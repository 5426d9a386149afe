mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Commands;
use commands::{run_check, run_fix, run_kit};

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let raw_args: Vec<String> = std::env::args().collect();
    let args = cli::parse();

    // Logs go to stderr so stdout stays machine-readable.
    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match args.command {
        Commands::Check {
            design,
            source,
            project,
            min_score,
            no_audit,
            format,
            output,
        } => {
            run_check(
                &raw_args,
                args.config,
                args.verbose,
                design,
                source,
                project,
                min_score,
                no_audit,
                format,
                output,
            )
            .await
        }
        Commands::Fix {
            design,
            source,
            write,
            format,
            output,
        } => {
            run_fix(
                &raw_args,
                args.config,
                args.verbose,
                design,
                source,
                write,
                format,
                output,
            )
            .await
        }
        Commands::Kit {
            store,
            format,
            action,
        } => run_kit(&raw_args, args.config, args.verbose, store, format, action).await,
    }
}
