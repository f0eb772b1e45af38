use clap::{Parser, Subcommand};
use std::process::ExitCode;
use switchy::core::format_error_with_help;
use switchy::di::ServiceContainer;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "switchy")]
#[command(about = "Download, cache and switch between SDK versions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available SDK types, or the versions of one SDK
    List {
        /// SDK type to list versions for (e.g. "java")
        sdk_type: Option<String>,
    },
    /// Install (if needed) and activate an SDK version
    Use {
        /// SDK type (e.g. "java")
        sdk_type: String,
        /// Exact version string from `switchy list <sdk>`
        version: String,
    },
    /// Print the Switchy version
    Version,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Version = cli.command {
        cli::version::run();
        return ExitCode::SUCCESS;
    }

    // Setup failures (unreadable or unwritable config) are the only non-zero exits
    let container = match ServiceContainer::new() {
        Ok(container) => container,
        Err(e) => {
            eprintln!("\n{}", format_error_with_help(&e));
            return ExitCode::FAILURE;
        }
    };
    let installer = container.installer();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = match cli.command {
        Commands::List { sdk_type } => cli::list::run(&installer, sdk_type, &cancel).await,
        Commands::Use { sdk_type, version } => {
            cli::use_sdk::run(&installer, &sdk_type, &version, &cancel).await
        }
        Commands::Version => Ok(()),
    };

    if let Err(e) = result {
        eprintln!("\n{}", format_error_with_help(&e));
    }
    ExitCode::SUCCESS
}
